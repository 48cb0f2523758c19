mod node;
mod raw_avl_map;

pub(crate) use node::Node;
pub(crate) use raw_avl_map::RawAvlTreeMap;
