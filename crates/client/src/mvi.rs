/// Pure state transition: consumes the old state and an intent, yields the next state.
pub trait Reducer {
    type State;
    type Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
