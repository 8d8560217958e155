// implemented by owners of scheduled callbacks and channel subscriptions; destroy cancels
// them so nothing fires against state that has been torn down
pub trait Destroyable {
    fn destroy(&mut self);
}
