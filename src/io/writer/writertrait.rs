use serde_json::Value;

use crate::error::Error;

pub trait WriterTrait {
    type Item;

    fn write(&mut self, vals: Vec<Self::Item>) -> Result<(), Error>;
    fn write_single(&mut self, val: &Self::Item) -> Result<(), Error>;
    /// Flush and finalize the underlying file(s).
    fn close(&mut self) -> Result<(), Error>;
}

/// In-memory sink, mostly useful for library users and tests.
impl WriterTrait for Vec<Value> {
    type Item = Value;

    fn write(&mut self, vals: Vec<Value>) -> Result<(), Error> {
        self.extend(vals);
        Ok(())
    }

    fn write_single(&mut self, val: &Value) -> Result<(), Error> {
        self.push(val.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Sink that drops every record, used when only the report matters.
#[derive(Debug, Default)]
pub struct Discard {
    nb_records: usize,
}

impl Discard {
    pub fn nb_records(&self) -> usize {
        self.nb_records
    }
}

impl WriterTrait for Discard {
    type Item = Value;

    fn write(&mut self, vals: Vec<Value>) -> Result<(), Error> {
        self.nb_records += vals.len();
        Ok(())
    }

    fn write_single(&mut self, _val: &Value) -> Result<(), Error> {
        self.nb_records += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn discard_counts() {
        let mut d = Discard::default();
        d.write(vec![json!(1), json!(2)]).unwrap();
        d.write_single(&json!(3)).unwrap();
        d.close().unwrap();
        assert_eq!(d.nb_records(), 3);
    }
}
