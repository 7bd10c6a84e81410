use super::candidates::MatchCandidate;

/// A candidate accepted by [`assign_matches`].
pub type FinalMatch = MatchCandidate;

/// Greedy conflict-free assignment.
///
/// Candidates are visited from highest to lowest similarity (ties keep their
/// enumeration order). A candidate is accepted when its sprite is still
/// unclaimed and, with `exclusive_backgrounds`, its background region too.
/// The walk stops once every sprite is claimed, or every background region
/// when exclusivity is on. Output is sorted by `sprite_index`.
pub fn assign_matches(
    mut candidates: Vec<MatchCandidate>,
    sprite_count: usize,
    background_count: usize,
    exclusive_backgrounds: bool,
) -> Vec<FinalMatch> {
    candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    let mut sprite_claimed = vec![false; sprite_count];
    let mut background_claimed = vec![false; background_count];
    let (mut sprites_left, mut backgrounds_left) = (sprite_count, background_count);
    let mut accepted = Vec::new();

    for cand in candidates {
        if sprites_left == 0 || (exclusive_backgrounds && backgrounds_left == 0) {
            break;
        }
        let Some(sprite_taken) = sprite_claimed.get(cand.sprite_index).copied() else {
            continue;
        };
        let Some(bg_taken) = background_claimed.get(cand.background_index).copied() else {
            continue;
        };
        if sprite_taken || (exclusive_backgrounds && bg_taken) {
            continue;
        }

        sprite_claimed[cand.sprite_index] = true;
        sprites_left -= 1;
        if !bg_taken {
            background_claimed[cand.background_index] = true;
            backgrounds_left -= 1;
        }
        accepted.push(cand);
    }

    accepted.sort_by_key(|m| m.sprite_index);
    accepted
}
