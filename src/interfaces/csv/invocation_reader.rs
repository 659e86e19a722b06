use crate::domain::operation::Operation;
use crate::error::{LedgerError, Result};
use std::io::Read;

/// One call at the text boundary: a function name and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn to_operation(&self) -> Result<Operation> {
        Operation::parse(&self.function, &self.args)
    }
}

/// Reads invocations from a CSV script.
///
/// The script has no header. Each row is `function,arg1,arg2,...`; rows may have any length,
/// fields are trimmed, and lines starting with `#` are skipped.
pub struct InvocationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvocationReader<R> {
    /// Creates a new `InvocationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads invocations, one per row.
    pub fn invocations(self) -> impl Iterator<Item = Result<Invocation>> {
        self.reader.into_records().map(|record| -> Result<Invocation> {
            let record = record?;
            let mut fields = record.iter().map(str::to_string);
            let function = fields
                .next()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| LedgerError::InvalidArgument("Missing function name".to_string()))?;
            Ok(Invocation {
                function,
                args: fields.collect(),
            })
        })
    }
}
