// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for postcraft.
//!
//! This crate provides the trait seams, error type, and shared data model
//! used throughout the workspace. Every external integration implements one
//! of the adapter traits defined here.

pub mod error;
pub mod schedule;
pub mod traits;
pub mod types;

pub use error::PostcraftError;
pub use schedule::{ScheduleBook, ScheduledContentType, ScheduledPost};
pub use types::{AdapterType, HealthStatus, MessageId, PostId, SenderId};

pub use traits::{
    ChannelAdapter, GenerationAdapter, MediaFetcher, PluginAdapter, PublisherAdapter, StateStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_display_round_trip() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Channel,
            AdapterType::Generation,
            AdapterType::Storage,
            AdapterType::Publisher,
            AdapterType::Fetcher,
        ];
        for variant in &variants {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_generation_adapter<T: GenerationAdapter>() {}
        fn _assert_publisher_adapter<T: PublisherAdapter>() {}
        fn _assert_state_store<T: StateStore>() {}
        fn _assert_media_fetcher<T: MediaFetcher>() {}
    }

    #[test]
    fn sender_id_displays_raw_value() {
        let sid = SenderId("psid-42".into());
        assert_eq!(sid.to_string(), "psid-42");
    }
}
