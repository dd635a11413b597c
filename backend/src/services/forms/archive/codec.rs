//! Per-type encoding of declared columns.
//!
//! Encoding renders a value as text, sealing `Text` columns. Decoding never
//! fails: unparseable booleans become `false`, numbers `0`, dates stay unset.

use super::cipher::ArchiveCipher;
use super::feed::ScopedElements;
use crate::error::Result;
use common::model::column::{DataType, Record};
use common::model::convert;
use common::model::entity::Value;
use rust_decimal::Decimal;

pub struct ValueCodec<'a> {
    cipher: &'a ArchiveCipher,
}

impl<'a> ValueCodec<'a> {
    pub fn new(cipher: &'a ArchiveCipher) -> Self {
        Self { cipher }
    }

    pub fn encode(&self, data_type: DataType, value: &Value) -> Result<String> {
        let text = value.to_string();
        match data_type {
            DataType::Text => self.cipher.encrypt(&text),
            _ => Ok(text),
        }
    }

    pub fn decode(&self, data_type: DataType, text: &str) -> Value {
        match data_type {
            DataType::Boolean => Value::Bool(convert::to_bool(text, false)),
            DataType::DateTime => convert::to_date_time(text).into(),
            DataType::Decimal => {
                Value::Decimal(convert::to_decimal_with_negative(text, Decimal::ZERO))
            }
            DataType::Integer => Value::Integer(convert::to_int_with_negative(text, 0)),
            DataType::Text => Value::String(self.cipher.decrypt(text)),
            DataType::VarChar => Value::String(text.to_string()),
        }
    }

    /// Writes every declared column of `record` into `elements`.
    pub fn write_columns<R: Record>(
        &self,
        record: &R,
        elements: &mut ScopedElements,
    ) -> Result<()> {
        for column in R::TABLE_COLUMNS {
            let value = record.column_value(column.attribute_name);
            elements.push(column.attribute_name, self.encode(column.data_type, &value)?);
        }
        Ok(())
    }

    /// Decodes every declared column of `R` from `elements` into `record`.
    /// Absent elements decode like empty text.
    pub fn read_columns<R: Record>(&self, elements: &ScopedElements, record: &mut R) {
        for column in R::TABLE_COLUMNS {
            let value = self.decode(column.data_type, elements.content(column.attribute_name));
            record.set_column_value(column.attribute_name, value);
        }
    }
}
