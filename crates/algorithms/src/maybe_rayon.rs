//! Compatibility layer for rayon/sequential execution.
//!
//! With the `parallel` feature, row loops fan out over rayon's thread pool.
//! Without it (the default), `into_par_iter()` resolves to a plain
//! `into_iter()` and the pipeline runs on the calling thread. Either way
//! rows are collected in order, so results are identical.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
