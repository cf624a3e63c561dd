//! Stream candidate selection

use crate::types::StreamCandidate;

/// Containers the web audio stack handles best, most preferred first
const PREFERRED_MIME_PREFIXES: [&str; 2] = ["audio/mp4", "audio/webm"];

/// Pick the candidate to stream: audio/mp4, then audio/webm, then any
/// audio type, then whatever the catalog listed first.
pub fn select_preferred(candidates: &[StreamCandidate]) -> Option<&StreamCandidate> {
    for prefix in PREFERRED_MIME_PREFIXES {
        if let Some(found) = candidates
            .iter()
            .find(|candidate| candidate.mime_type.starts_with(prefix))
        {
            return Some(found);
        }
    }

    candidates
        .iter()
        .find(|candidate| candidate.mime_type.starts_with("audio/"))
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mime_type: &str) -> StreamCandidate {
        StreamCandidate {
            url: format!("https://cdn/{}", mime_type),
            mime_type: mime_type.to_string(),
        }
    }

    #[test]
    fn prefers_mp4_over_everything() {
        let candidates = vec![
            candidate("audio/webm; codecs=\"opus\""),
            candidate("audio/mp4; codecs=\"mp4a.40.2\""),
        ];
        assert_eq!(
            select_preferred(&candidates).unwrap().mime_type,
            "audio/mp4; codecs=\"mp4a.40.2\""
        );
    }

    #[test]
    fn falls_back_to_webm_without_mp4() {
        let candidates = vec![
            candidate("audio/ogg"),
            candidate("audio/webm; codecs=\"opus\""),
        ];
        assert_eq!(
            select_preferred(&candidates).unwrap().mime_type,
            "audio/webm; codecs=\"opus\""
        );
    }

    #[test]
    fn any_audio_beats_non_audio() {
        let candidates = vec![candidate("application/ogg"), candidate("audio/flac")];
        assert_eq!(select_preferred(&candidates).unwrap().mime_type, "audio/flac");
    }

    #[test]
    fn last_resort_is_the_first_candidate() {
        let candidates = vec![candidate("application/ogg"), candidate("application/x-thing")];
        assert_eq!(
            select_preferred(&candidates).unwrap().mime_type,
            "application/ogg"
        );
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_preferred(&[]).is_none());
    }
}
