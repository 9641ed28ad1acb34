//! User-facing messages, embed headers, and display-record mappers for the
//! Spotify commands.

use twilight_model::channel::message::embed::Embed;

use tempo_spotify::{Artist, RecentPlay, Track, UserProfile};
use tempo_utils::embed::{DEFAULT_EMBED_COLOR, notice_embed};
use tempo_utils::pagination::{DisplayRecord, PageHeader};

pub const NOT_LINKED_MESSAGE: &str =
    "You haven't linked a Spotify account yet. Run `!login` to get started.";
pub const TRY_AGAIN_MESSAGE: &str =
    "Spotify didn't answer in time. Please try again in a moment.";
pub const STORAGE_FAILED_MESSAGE: &str =
    "Something went wrong on our side. Please try again later.";
pub const EXCHANGE_FAILED_MESSAGE: &str =
    "That authorization code was rejected. Run `!login` for a fresh link and paste the new code.";
pub const LINKED_MESSAGE: &str =
    "Your Spotify account is linked. Try `!artists`, `!tracks`, or `!recent`.";
pub const UNLINKED_MESSAGE: &str = "Your Spotify account has been unlinked.";
pub const NOT_LINKED_LOGOUT_MESSAGE: &str = "No Spotify account was linked.";
pub const AUTH_USAGE_MESSAGE: &str = "Usage: `!auth <code>` (the code or full URL from `!login`)";

/// Login instructions pointing at the authorize URL.
pub fn login_embed(authorize_url: &str) -> anyhow::Result<Embed> {
    let description = format!(
        "1. [Authorize access]({authorize_url})\n\
         2. Copy the code (or the whole URL) from the page you land on.\n\
         3. Finish linking with `!auth <code>`."
    );

    notice_embed("Link your Spotify account", description)
}

/// Embed header shared by every page of one result set.
pub fn profile_header(title: &str, profile: &UserProfile) -> PageHeader {
    PageHeader {
        title: title.to_owned(),
        description: Some(format!(
            "[{}]({}) on Spotify",
            profile.display_name, profile.url
        )),
        thumbnail: profile.image.clone(),
        color: DEFAULT_EMBED_COLOR,
    }
}

/// Map top artists to ranked display records.
pub fn artist_records(artists: Vec<Artist>) -> Vec<DisplayRecord> {
    artists
        .into_iter()
        .enumerate()
        .map(|(index, artist)| {
            DisplayRecord::new(artist.name, format!("{} followers", artist.followers))
                .with_link(artist.url)
                .with_rank(index + 1)
        })
        .collect()
}

/// Map top tracks to ranked display records with album credit.
pub fn track_records(tracks: Vec<Track>) -> Vec<DisplayRecord> {
    tracks
        .into_iter()
        .enumerate()
        .map(|(index, track)| {
            let primary = format!("{} - {}", track.name, track.artist_credit());
            let secondary = format!("from album [{}]({})", track.album_name, track.album_url);

            DisplayRecord::new(primary, secondary)
                .with_link(track.url)
                .with_rank(index + 1)
        })
        .collect()
}

/// Map the listening history to unranked, timestamped display records.
pub fn recent_records(plays: Vec<RecentPlay>) -> Vec<DisplayRecord> {
    plays
        .into_iter()
        .map(|play| {
            let primary = format!("{} - {}", play.track.name, play.track.artist_credit());

            DisplayRecord::new(primary, "")
                .with_link(play.track.url)
                .with_played_at(play.played_at)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(name: &str, followers: u64) -> Artist {
        Artist {
            name: name.to_owned(),
            url: format!("https://open.spotify.com/artist/{name}"),
            followers,
        }
    }

    fn track(name: &str) -> Track {
        Track {
            name: name.to_owned(),
            url: format!("https://open.spotify.com/track/{name}"),
            artists: vec!["A".to_owned(), "B".to_owned()],
            album_name: "Album".to_owned(),
            album_url: "https://open.spotify.com/album/x".to_owned(),
        }
    }

    #[test]
    fn artists_are_ranked_in_order() {
        let records = artist_records(vec![artist("one", 100), artist("two", 50)]);

        assert_eq!(records[0].rank, Some(1));
        assert_eq!(records[1].rank, Some(2));
        assert_eq!(records[0].primary, "one");
        assert_eq!(records[0].secondary, "100 followers");
        assert_eq!(
            records[0].link.as_deref(),
            Some("https://open.spotify.com/artist/one")
        );
    }

    #[test]
    fn tracks_carry_artist_credit_and_album() {
        let records = track_records(vec![track("Song")]);

        assert_eq!(records[0].primary, "Song - A, B");
        assert_eq!(
            records[0].secondary,
            "from album [Album](https://open.spotify.com/album/x)"
        );
        assert_eq!(records[0].rank, Some(1));
        assert!(records[0].played_at.is_none());
    }

    #[test]
    fn recent_plays_are_unranked_with_timestamps() {
        let records = recent_records(vec![RecentPlay {
            track: track("Song"),
            played_at: 1_700_000_000,
        }]);

        assert_eq!(records[0].rank, None);
        assert_eq!(records[0].played_at, Some(1_700_000_000));
        assert_eq!(records[0].primary, "Song - A, B");
    }

    #[test]
    fn header_links_the_profile() {
        let profile = UserProfile {
            display_name: "Listener".to_owned(),
            url: "https://open.spotify.com/user/listener".to_owned(),
            image: Some("https://i.scdn.co/image/abc".to_owned()),
        };

        let header = profile_header("Top Artists", &profile);

        assert_eq!(header.title, "Top Artists");
        assert_eq!(
            header.description.as_deref(),
            Some("[Listener](https://open.spotify.com/user/listener) on Spotify")
        );
        assert_eq!(header.thumbnail.as_deref(), Some("https://i.scdn.co/image/abc"));
    }
}
