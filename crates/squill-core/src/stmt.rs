mod direction;
pub use direction::Direction;

mod filter;
pub use filter::{FilterLeaf, FilterNode, FilterRelation, Operand};

mod op;
pub use op::Op;

mod order_by;
pub use order_by::OrderSpec;

mod page;
pub use page::Page;

mod ty;
pub use ty::ColumnType;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
