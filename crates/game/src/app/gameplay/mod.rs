mod field;
mod render;

pub(crate) use field::BlockField;
pub(crate) use render::FieldRenderer;
