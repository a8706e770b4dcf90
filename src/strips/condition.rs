use super::literal::{Literal, State};

/// True when every positive literal holds in `state` and no negative one does.
///
/// An empty condition is always satisfied.
pub fn is_satisfied(state: &State, condition: &[Literal]) -> bool {
    let required = condition.iter().filter(|l| l.is_positive()).count();
    let mut matched = 0;
    for literal in condition {
        if state.contains(literal) {
            if literal.is_negative() {
                return false;
            }
            matched += 1;
        }
    }
    matched == required
}

/// Goals are tested exactly like preconditions.
#[inline]
pub fn is_goal(state: &State, goal: &[Literal]) -> bool {
    is_satisfied(state, goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(facts: &[(&str, &[&str])]) -> State {
        facts.iter().map(|(name, params)| Literal::positive(name, params)).collect()
    }

    #[test]
    fn test_empty_condition() {
        assert!(is_satisfied(&State::new(), &[]));
        assert!(is_goal(&state(&[("clear", &["a"])]), &[]));
    }

    #[test]
    fn test_positive() {
        let s = state(&[("clear", &["a"]), ("on", &["a", "table"])]);
        assert!(is_satisfied(&s, &[Literal::positive("clear", &["a"])]));
        assert!(is_satisfied(&s, &[Literal::positive("clear", &["a"]), Literal::positive("on", &["a", "table"])]));
        assert!(!is_satisfied(&s, &[Literal::positive("clear", &["a"]), Literal::positive("clear", &["b"])]));
    }

    #[test]
    fn test_negative_precondition_blocks() {
        let s = state(&[("clear", &["a"]), ("clear", &["b"]), ("on", &["a", "table"])]);
        let condition = [
            Literal::positive("clear", &["a"]),
            Literal::positive("on", &["a", "table"]),
            Literal::negative("clear", &["b"]),
        ];
        assert!(!is_satisfied(&s, &condition));
        let s = state(&[("clear", &["a"]), ("on", &["a", "table"])]);
        assert!(is_satisfied(&s, &condition));
    }

    #[test]
    fn test_negative_goal() {
        let goal = [Literal::positive("on", &["a", "b"]), Literal::negative("clear", &["b"])];
        assert!(is_goal(&state(&[("on", &["a", "b"]), ("clear", &["a"])]), &goal));
        assert!(!is_goal(&state(&[("on", &["a", "b"]), ("clear", &["b"])]), &goal));
    }

    #[test]
    fn test_repeated_literal_counts_once_each() {
        let s = state(&[("clear", &["a"])]);
        let condition = [Literal::positive("clear", &["a"]), Literal::positive("clear", &["a"])];
        assert!(is_satisfied(&s, &condition));
        let condition = [Literal::positive("clear", &["a"]), Literal::positive("clear", &["b"])];
        assert!(!is_satisfied(&s, &condition));
    }
}
