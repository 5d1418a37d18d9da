//! Category-restricted view of a dictionary.

use geoscope_core::models::CategoryDistribution;
use geoscope_core::ports::DictionaryModel;

/// Hides every category rejected by `allowed`.
///
/// Entries are filtered on each query. Document and term totals are passed
/// through unchanged, so priors computed from them are only approximately
/// those of the restricted model.
pub struct FocusDictionaryDecorator<'a, P> {
    decorated: &'a dyn DictionaryModel,
    allowed: P,
}

impl<'a, P> FocusDictionaryDecorator<'a, P>
where
    P: Fn(&str) -> bool + Send + Sync,
{
    pub fn new(decorated: &'a dyn DictionaryModel, allowed: P) -> Self {
        Self { decorated, allowed }
    }
}

impl<P> DictionaryModel for FocusDictionaryDecorator<'_, P>
where
    P: Fn(&str) -> bool + Send + Sync,
{
    fn visit_entries(&self, term: &str, visit: &mut dyn FnMut(&str, u64)) {
        self.decorated.visit_entries(term, &mut |category: &str, count: u64| {
            if (self.allowed)(category) {
                visit(category, count);
            }
        });
    }

    fn visit_categories(&self, visit: &mut dyn FnMut(&str)) {
        self.decorated.visit_categories(&mut |category: &str| {
            if (self.allowed)(category) {
                visit(category);
            }
        });
    }

    fn document_counts(&self) -> &CategoryDistribution {
        self.decorated.document_counts()
    }

    fn term_counts(&self) -> &CategoryDistribution {
        self.decorated.term_counts()
    }

    fn num_terms(&self) -> usize {
        self.decorated.num_terms()
    }
}
