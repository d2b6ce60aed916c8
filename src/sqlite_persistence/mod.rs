mod table;

pub use table::{Column, ForeignKey, ForeignKeyOnChange, Schema, SchemaError, SqlType, Table};
