// Widget components built on the Tabkit component model

pub mod tabs;
