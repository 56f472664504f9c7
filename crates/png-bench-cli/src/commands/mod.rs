pub mod backends;
pub mod corpus;
pub mod prepare;
pub mod run;

use png_bench::CorpusOptions;

use crate::CorpusArgs;

impl CorpusArgs {
    pub fn options(&self) -> CorpusOptions {
        CorpusOptions {
            raw_extension: self.raw_ext.clone(),
            reference_extension: self.reference_ext.clone(),
        }
    }
}
