/// How many broadcasts a successful `splice_at` produces outside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpliceNotifications {
    /// One from the inner `set_at`, one more afterwards.
    #[default]
    Double,
    Single,
}

/// Options fixed at mutator construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutatorOptions {
    pub splice_notifications: SpliceNotifications,
}
