use super::action::GroundAction;
use super::literal::{Literal, State};

/// Successor of `state` after `action`. The precondition is not re-checked.
pub fn apply(action: &GroundAction, state: &State) -> State {
    apply_effect(&action.effect, state)
}

/// Applies all effect literals at once against `state`: positive literals are
/// added, negative ones removed, and a removal beats an add of the same fact.
pub fn apply_effect(effect: &[Literal], state: &State) -> State {
    let removed: Vec<&Literal> = effect.iter().filter(|l| l.is_negative()).collect();
    let is_removed = |fact: &Literal| removed.iter().any(|r| *r == fact);
    state.iter()
        .filter(|fact| !is_removed(*fact))
        .chain(effect.iter().filter(|l| l.is_positive() && !is_removed(*l)))
        .cloned()
        .collect()
}
