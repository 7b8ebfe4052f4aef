#[derive(Debug, Clone)]
pub enum GateIntent<Id> {
    /// Delete requested for `Id`; replaces any earlier pending target.
    Request(Id),
    Cancel,
    /// User confirmed. The gate closes whatever the delete call returns.
    Confirm,
}
