use std::fmt::{Display, Formatter};

/// Running figures of an evaluation, handed to the progress hook.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub rows_seen: u64,
    pub seconds: f64,
    pub accuracy: f64,
    pub kappa: f64,
    /// Set on the single report sent after the last row.
    pub finished: bool,
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows in {:.1}s, accuracy {:.4}, kappa {:.4}",
            self.rows_seen, self.seconds, self.accuracy, self.kappa
        )?;
        if self.finished {
            write!(f, " (done)")?;
        }
        Ok(())
    }
}
