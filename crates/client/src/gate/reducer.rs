use std::marker::PhantomData;

use super::intent::GateIntent;
use super::state::GateState;
use crate::mvi::Reducer;

pub struct GateReducer<Id>(PhantomData<Id>);

impl<Id> Reducer for GateReducer<Id> {
    type State = GateState<Id>;
    type Intent = GateIntent<Id>;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            GateIntent::Request(id) => GateState::PendingConfirm(id),
            GateIntent::Cancel | GateIntent::Confirm => GateState::Idle,
        }
    }
}
