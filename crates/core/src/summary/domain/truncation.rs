/// Bound a token sequence to `budget` tokens by dropping the middle.
///
/// Keeps the leading half of the budget plus the trailing two-thirds of
/// the budget taken from the end, capped at the budget overall, so an
/// over-long transcript keeps its lead-in and its conclusion.
pub fn truncate_middle<T: Clone>(tokens: &[T], budget: usize) -> Vec<T> {
    if tokens.len() <= budget {
        return tokens.to_vec();
    }
    if budget == 0 {
        return Vec::new();
    }

    let head = budget / 2;
    let tail = budget / 3 * 2;

    let mut kept = Vec::with_capacity(head + tail);
    kept.extend_from_slice(&tokens[..head]);
    kept.extend_from_slice(&tokens[tokens.len() - tail..]);
    kept.truncate(budget);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_budget_is_unchanged() {
        let tokens: Vec<u32> = (0..10).collect();
        assert_eq!(truncate_middle(&tokens, 10), tokens);
        assert_eq!(truncate_middle(&tokens, 100), tokens);
    }

    #[test]
    fn test_over_budget_never_exceeds_budget() {
        let tokens: Vec<u32> = (0..1_000).collect();
        assert_eq!(truncate_middle(&tokens, 120).len(), 120);
    }

    #[test]
    fn test_keeps_lead_in_and_conclusion() {
        let tokens: Vec<u32> = (0..100).collect();
        let kept = truncate_middle(&tokens, 12);
        // Head: first budget/2 tokens.
        assert_eq!(&kept[..6], &[0, 1, 2, 3, 4, 5]);
        // Remainder comes from the trailing window.
        assert_eq!(&kept[6..], &[92, 93, 94, 95, 96, 97]);
    }

    #[test]
    fn test_zero_budget_is_empty() {
        let tokens: Vec<u32> = (0..10).collect();
        assert!(truncate_middle(&tokens, 0).is_empty());
    }

    #[test]
    fn test_empty_input_is_empty() {
        let tokens: Vec<u32> = Vec::new();
        assert!(truncate_middle(&tokens, 8).is_empty());
    }
}
