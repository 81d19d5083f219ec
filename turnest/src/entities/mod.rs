mod part;
mod schedule;
mod settings;
mod sheet;
mod tool;

#[doc(inline)]
pub use part::{Material, NestingConstraints, Part, PartCatalog, PartGeometry, PlacedPunch};

#[doc(inline)]
pub use schedule::ScheduledPart;

#[doc(inline)]
pub use settings::{
    Clamp, NestingSettings, PackerKind, SheetMargins, SheetStrategy, Spacing,
};

#[doc(inline)]
pub use sheet::{NestResultSheet, PPartKey, PlacedPart, SheetDef, SheetLayout};

#[doc(inline)]
pub use tool::{Tool, ToolCatalog, ToolShape};
