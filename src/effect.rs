use crate::payload::PredictionRequest;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Arm one wait for the next inbound server push.
    Listen,
    /// Transmit a serialized request, fire-and-forget.
    Send { request: PredictionRequest },
}
