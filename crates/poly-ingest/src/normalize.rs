//! Normalization of raw API records into storage rows.

use crate::models::{RawTrade, Trade};

/// Flatten a raw record into its storage shape.
///
/// The five nullable profile fields become empty strings when null or
/// missing, so the store never sees a null in a text column. Every other
/// field is carried over verbatim.
pub fn normalize(raw: RawTrade) -> Trade {
    Trade {
        proxy_wallet: raw.proxy_wallet,
        side: raw.side,
        asset: raw.asset,
        condition_id: raw.condition_id,
        size: raw.size,
        price: raw.price,
        timestamp: raw.timestamp,
        title: raw.title,
        slug: raw.slug,
        icon: raw.icon,
        event_slug: raw.event_slug,
        outcome: raw.outcome,
        outcome_index: raw.outcome_index,
        name: raw.name.unwrap_or_default(),
        pseudonym: raw.pseudonym.unwrap_or_default(),
        bio: raw.bio.unwrap_or_default(),
        profile_image: raw.profile_image.unwrap_or_default(),
        profile_image_optimized: raw.profile_image_optimized.unwrap_or_default(),
        transaction_hash: raw.transaction_hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_trade() -> RawTrade {
        RawTrade {
            proxy_wallet: "0x9d84ce0306f8551e02efef1680475fc0f1dc1344".to_string(),
            side: "BUY".to_string(),
            asset: "72936048731589292555781174533757608024096898681".to_string(),
            condition_id: "0xd5a0c1b834b1579b305477e2e64ad6b1".to_string(),
            size: 25.0,
            price: 0.55,
            timestamp: 1719393600,
            title: "Will the event happen?".to_string(),
            slug: "will-the-event-happen".to_string(),
            icon: "https://example.com/icon.png".to_string(),
            event_slug: "the-event".to_string(),
            outcome: "Yes".to_string(),
            outcome_index: 0,
            name: Some("trader-one".to_string()),
            pseudonym: Some("Quick-Fox".to_string()),
            bio: Some("occasional trader".to_string()),
            profile_image: Some("https://example.com/p.png".to_string()),
            profile_image_optimized: Some("https://example.com/p-opt.png".to_string()),
            transaction_hash: "0x10f49f46b21a2633a1f2a06b3f23c9ae".to_string(),
        }
    }

    #[test]
    fn test_present_fields_pass_through() {
        let trade = normalize(raw_trade());

        assert_eq!(trade.proxy_wallet, "0x9d84ce0306f8551e02efef1680475fc0f1dc1344");
        assert_eq!(trade.side, "BUY");
        assert_eq!(trade.size, 25.0);
        assert_eq!(trade.price, 0.55);
        assert_eq!(trade.timestamp, 1719393600);
        assert_eq!(trade.outcome_index, 0);
        assert_eq!(trade.name, "trader-one");
        assert_eq!(trade.pseudonym, "Quick-Fox");
        assert_eq!(trade.bio, "occasional trader");
        assert_eq!(trade.profile_image, "https://example.com/p.png");
        assert_eq!(trade.profile_image_optimized, "https://example.com/p-opt.png");
        assert_eq!(trade.transaction_hash, "0x10f49f46b21a2633a1f2a06b3f23c9ae");
    }

    #[test]
    fn test_null_profile_fields_become_empty_strings() {
        let mut raw = raw_trade();
        raw.name = None;
        raw.pseudonym = None;
        raw.bio = None;
        raw.profile_image = None;
        raw.profile_image_optimized = None;

        let trade = normalize(raw);

        assert_eq!(trade.name, "");
        assert_eq!(trade.pseudonym, "");
        assert_eq!(trade.bio, "");
        assert_eq!(trade.profile_image, "");
        assert_eq!(trade.profile_image_optimized, "");
        // Non-profile fields are untouched by the flattening.
        assert_eq!(trade.outcome, "Yes");
    }

    #[test]
    fn test_mixed_null_and_present() {
        let mut raw = raw_trade();
        raw.bio = None;

        let trade = normalize(raw);

        assert_eq!(trade.bio, "");
        assert_eq!(trade.name, "trader-one");
    }
}
