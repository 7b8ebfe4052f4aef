#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState<Id> {
    Idle,
    PendingConfirm(Id),
}

impl<Id> Default for GateState<Id> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<Id> GateState<Id> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingConfirm(_))
    }

    pub fn target(&self) -> Option<&Id> {
        match self {
            Self::PendingConfirm(id) => Some(id),
            Self::Idle => None,
        }
    }
}
