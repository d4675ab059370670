//! Story content tables. The engine treats everything here as data.

use crate::items::Artifact;

/// Looks up a story artifact by id. Returns `None` for unknown ids, which
/// the snapshot boundary treats as a malformed record.
pub fn artifact(id: &str) -> Option<Artifact> {
    let (name, description) = match id {
        "guiding-thread" => (
            "Guiding Thread",
            "A magic ball of yarn that unwinds toward the true path.",
        ),
        "golden-key" => ("Golden Key", "One of three keys to the treasure chest."),
        "silver-key" => ("Silver Key", "One of three keys to the treasure chest."),
        "bone-key" => ("Bone Key", "One of three keys to the treasure chest."),
        "leshy-pipe" => (
            "Leshy's Pipe",
            "A willow pipe that calls the forest spirits to your side.",
        ),
        "nightingale-egg" => (
            "Nightingale's Egg",
            "An egg from the robber's nest. Weakens the Shadow of Koschei.",
        ),
        "treasure-sword" => (
            "Treasure Sword",
            "A legendary blade that bites deep into the unclean.",
        ),
        "living-water" => (
            "Living Water",
            "Water from the river spirit's spring. Mends any wound.",
        ),
        "firebird-feather" => (
            "Firebird Feather",
            "A glowing feather that holds fire. One use, 40 fire damage.",
        ),
        "truth-mirror" => (
            "Mirror of Truth",
            "Shows things as they really are, and enemies their weakness.",
        ),
        "koschei-ring" => (
            "Koschei's Ring",
            "The mark of Koschei's servants. Cold as death itself.",
        ),
        _ => return None,
    };
    Some(Artifact::new(id, name, description))
}

/// All artifact ids the catalog knows about, in story order.
pub fn artifact_ids() -> &'static [&'static str] {
    &[
        "guiding-thread",
        "golden-key",
        "silver-key",
        "bone-key",
        "leshy-pipe",
        "nightingale-egg",
        "treasure-sword",
        "living-water",
        "firebird-feather",
        "truth-mirror",
        "koschei-ring",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_consistent() {
        for id in artifact_ids() {
            let artifact = artifact(id).expect("listed id must resolve");
            assert_eq!(&artifact.id, id);
            assert!(!artifact.name.is_empty());
        }
        assert!(artifact("rusty-nail").is_none());
    }
}
