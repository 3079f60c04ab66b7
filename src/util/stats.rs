//! Per-collection statistics and the host reporting boundary.

use crate::util::address::WordSize;

/// The host callback that receives heap statistics after every collection
/// cycle.  Invoked exactly once per cycle, after the collector has updated
/// its tables and before the triggering allocation returns to the mutator.
///
/// For the semispace collector the numbers are the objects and words
/// copied; for the mark-sweep collector they are the objects and words
/// retained.  The implementation must not call back into the collector.
pub trait GcStatsReporter {
    fn report_gc_stats(&mut self, live_objects: usize, live_words: usize);
}

/// Default reporter: forwards statistics to the `log` crate.
pub struct LogReporter;

impl GcStatsReporter for LogReporter {
    fn report_gc_stats(&mut self, live_objects: usize, live_words: usize) {
        info!(
            "collection finished: {} live objects, {} live words",
            live_objects, live_words
        );
    }
}

/// Running counters for the current collection cycle.
pub(crate) struct GcStats {
    objects: usize,
    words: WordSize,
    reporter: Box<dyn GcStatsReporter>,
}

impl GcStats {
    pub fn new(reporter: Box<dyn GcStatsReporter>) -> Self {
        GcStats {
            objects: 0,
            words: 0,
            reporter,
        }
    }

    /// Account one surviving object of `words` total words (header included).
    pub fn account_object(&mut self, words: WordSize) {
        self.objects += 1;
        self.words += words;
    }

    /// Report the accumulated counters to the host and reset them.
    pub fn flush(&mut self) {
        self.reporter.report_gc_stats(self.objects, self.words);
        self.objects = 0;
        self.words = 0;
    }
}
