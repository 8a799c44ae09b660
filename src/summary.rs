/// A compact, single line description of a statistics value, for logging.
pub trait MessageSummary {
    fn summary(&self) -> String;
}
