//! Shaping of raw catalog detail records into [`DisplayRecord`]s.

use crate::models::{DisplayRecord, RawDetail, StatBlock, StatKind};

/// Build the display record for `detail`.
///
/// Pure and deterministic. Stats are looked up by their stat-kind identifier
/// so the catalog's ordering does not matter; kinds that are missing stay 0.
/// The image prefers the official artwork and falls back to the default
/// sprite; empty references count as missing.
pub fn normalize(detail: &RawDetail) -> DisplayRecord {
    DisplayRecord {
        id: detail.id,
        name: detail.name.to_lowercase(),
        image: resolve_image(detail),
        types: detail.types.iter().map(|t| t.kind.name.clone()).collect(),
        stats: stat_block(detail),
        height: detail.height,
        weight: detail.weight,
    }
}

fn resolve_image(detail: &RawDetail) -> Option<String> {
    detail
        .official_artwork()
        .filter(|u| !u.is_empty())
        .or_else(|| detail.default_sprite().filter(|u| !u.is_empty()))
        .map(str::to_string)
}

fn stat_block(detail: &RawDetail) -> StatBlock {
    let mut block = StatBlock::default();
    for entry in &detail.stats {
        if let Some(kind) = StatKind::from_wire(&entry.stat.name) {
            block.set(kind, entry.base_stat);
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Artwork, NamedRef, OtherSprites, Sprites, StatEntry, TypeSlot};

    fn stat(name: &str, base: u32) -> StatEntry {
        StatEntry {
            base_stat: base,
            effort: 0,
            stat: NamedRef {
                name: name.to_string(),
                url: String::new(),
            },
        }
    }

    fn pikachu() -> RawDetail {
        RawDetail {
            id: 25,
            name: "Pikachu".into(),
            sprites: Sprites {
                front_default: Some("https://img/sprite/25.png".into()),
                other: Some(OtherSprites {
                    official_artwork: Some(Artwork {
                        front_default: Some("https://img/artwork/25.png".into()),
                    }),
                }),
            },
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedRef {
                    name: "electric".into(),
                    url: String::new(),
                },
            }],
            height: 4,
            weight: 60,
            base_experience: Some(112),
            stats: vec![
                stat("hp", 35),
                stat("attack", 55),
                stat("defense", 40),
                stat("special-attack", 50),
                stat("special-defense", 50),
                stat("speed", 90),
            ],
        }
    }

    #[test]
    fn normalizes_full_record() {
        let r = normalize(&pikachu());
        assert_eq!(r.id, 25);
        assert_eq!(r.name, "pikachu");
        assert_eq!(r.image.as_deref(), Some("https://img/artwork/25.png"));
        assert_eq!(r.types, vec!["electric".to_string()]);
        assert_eq!(r.stats.speed, 90);
        assert_eq!(r.stats.total(), 320);
        assert_eq!((r.height, r.weight), (4, 60));
    }

    #[test]
    fn empty_stats_become_zero_block() {
        let mut d = pikachu();
        d.stats.clear();
        assert_eq!(normalize(&d).stats, StatBlock::default());
    }

    #[test]
    fn stats_are_matched_by_kind_not_position() {
        let mut d = pikachu();
        d.stats.reverse();
        d.stats.retain(|s| s.stat.name != "defense");
        d.stats.push(stat("accuracy", 999));
        let r = normalize(&d);
        assert_eq!(r.stats.hp, 35);
        assert_eq!(r.stats.speed, 90);
        assert_eq!(r.stats.defense, 0);
    }

    #[test]
    fn falls_back_to_default_sprite() {
        let mut d = pikachu();
        d.sprites.other = None;
        assert_eq!(normalize(&d).image.as_deref(), Some("https://img/sprite/25.png"));

        let mut d = pikachu();
        d.sprites.other = Some(OtherSprites {
            official_artwork: Some(Artwork {
                front_default: Some(String::new()),
            }),
        });
        assert_eq!(normalize(&d).image.as_deref(), Some("https://img/sprite/25.png"));
    }

    #[test]
    fn no_image_when_both_missing() {
        let mut d = pikachu();
        d.sprites = Sprites::default();
        assert_eq!(normalize(&d).image, None);
    }

    #[test]
    fn deterministic() {
        let d = pikachu();
        let a = serde_json::to_vec(&normalize(&d)).unwrap();
        let b = serde_json::to_vec(&normalize(&d)).unwrap();
        assert_eq!(a, b);
    }
}
