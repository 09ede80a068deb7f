use crate::grid::Axis;




/**
 * Unified error type for the dU/dt core
 */
#[derive(thiserror::Error, Debug)]
pub enum RmhdError {

    #[error("grid has dimension {have:?} but an operation for {want:?} was requested")]
    DimensionMismatch { have: usize, want: usize },

    #[error("axis {0:?} is not active for a grid of this dimension")]
    InactiveAxis(Axis),

    #[error("{0}")]
    Config(#[from] anyhow::Error),
}




/**
 * Per-cell failure of the conserved-to-primitive Newton solve: the Newton
 * loop did not converge even after engaging the pressure floor and
 * restarting from a fresh seed.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellError {
    pub index: usize,
}




/**
 * Structured accumulation of per-cell recovery failures across an array or
 * a full dU/dt call, in place of a bare integer sum.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFailures {
    pub count: usize,
    pub first_failed: Option<usize>,
}

impl CellFailures {
    pub fn push(&mut self, index: usize) {
        self.count += 1;
        if self.first_failed.is_none() {
            self.first_failed = Some(index);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn merge(mut self, other: CellFailures) -> Self {
        if let Some(i) = other.first_failed {
            if self.first_failed.map_or(true, |j| i < j) {
                self.first_failed = Some(i);
            }
        }
        self.count += other.count;
        self
    }
}




#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn failures_track_first_index() {
        let mut f = CellFailures::default();
        assert!(f.is_empty());
        f.push(5);
        f.push(2);
        assert_eq!(f.count, 2);
        assert_eq!(f.first_failed, Some(5));
    }

    #[test]
    fn merge_keeps_earliest_index() {
        let mut a = CellFailures::default();
        a.push(10);
        let mut b = CellFailures::default();
        b.push(3);
        let m = a.merge(b);
        assert_eq!(m.count, 2);
        assert_eq!(m.first_failed, Some(3));
    }
}
