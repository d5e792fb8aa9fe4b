use crate::model::UserProfile;

/// State for the profile page: a read-through cache of the user's profile
/// document plus the avatar upload flow.
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub loading: bool,
    pub uploading: bool,
    /// `Some` while the avatar path prompt is open; holds the typed path.
    pub avatar_prompt: Option<String>,
    /// Ties in-flight fetches/uploads to the current identity; results
    /// carrying another generation are ignored.
    pub generation: u64,
}

impl Default for ProfileState {
    fn default() -> Self {
        ProfileState {
            profile: None,
            loading: false,
            uploading: false,
            avatar_prompt: None,
            generation: 0,
        }
    }
}

impl ProfileState {
    pub fn clear(&mut self) {
        self.profile = None;
        self.loading = false;
        self.uploading = false;
        self.avatar_prompt = None;
    }

    /// Applies a freshly uploaded photo address to the cached view, before
    /// the document write is even acknowledged.
    pub fn set_photo_url(&mut self, url: String) {
        if let Some(profile) = &mut self.profile {
            profile.profile_photo_url = Some(url);
        }
    }

    pub fn open_avatar_prompt(&mut self) {
        self.avatar_prompt = Some(String::new());
    }

    pub fn close_avatar_prompt(&mut self) {
        self.avatar_prompt = None;
    }
}
