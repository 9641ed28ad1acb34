//! Domain types returned by the API client, decoupled from the wire JSON.

/// Public profile of the linked account, shown in embed headers.
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub display_name: String,
    pub url: String,
    pub image: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Artist {
    pub name: String,
    pub url: String,
    pub followers: u64,
}

#[derive(Clone, Debug)]
pub struct Track {
    pub name: String,
    pub url: String,
    pub artists: Vec<String>,
    pub album_name: String,
    pub album_url: String,
}

/// One entry from the listening history.
#[derive(Clone, Debug)]
pub struct RecentPlay {
    pub track: Track,
    /// Unix seconds at which the play finished.
    pub played_at: u64,
}

impl Track {
    /// Comma-joined artist credit, e.g. `"Artist A, Artist B"`.
    pub fn artist_credit(&self) -> String {
        self.artists.join(", ")
    }
}
