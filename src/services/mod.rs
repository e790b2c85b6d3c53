pub mod completer;
pub mod room;
