// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quick-reply payload values shared by the classifier and the assembler.

use postcraft_core::types::Feature;

pub const FEATURE_CHAT: &str = "FEATURE_CHAT";
pub const FEATURE_EDIT_IMAGE: &str = "FEATURE_EDIT_IMAGE";
pub const FEATURE_DAILY_POST: &str = "FEATURE_DAILY_POST";
pub const FEATURE_SCHEDULE: &str = "FEATURE_SCHEDULE";
pub const CONFIRM_POST: &str = "CONFIRM_POST";

/// Payload carried by the shortcut for `feature`.
pub fn feature_payload(feature: Feature) -> &'static str {
    match feature {
        Feature::Chat => FEATURE_CHAT,
        Feature::EditImage => FEATURE_EDIT_IMAGE,
        Feature::DailyPost => FEATURE_DAILY_POST,
        Feature::Schedule => FEATURE_SCHEDULE,
    }
}

/// Feature named by an exact (case-insensitive) payload value.
pub fn feature_from_payload(payload: &str) -> Option<Feature> {
    [
        Feature::Chat,
        Feature::EditImage,
        Feature::DailyPost,
        Feature::Schedule,
    ]
    .into_iter()
    .find(|f| payload.eq_ignore_ascii_case(feature_payload(*f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_lookup_is_case_insensitive() {
        assert_eq!(
            feature_from_payload("feature_daily_post"),
            Some(Feature::DailyPost)
        );
        assert_eq!(feature_from_payload("FEATURE_SCHEDULE"), Some(Feature::Schedule));
        assert_eq!(feature_from_payload("FEATURE_UNKNOWN"), None);
    }
}
