#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ProbeServer,
    StartJob(crate::JobRequest),
}
