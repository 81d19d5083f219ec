use turnest::entities::{
    Clamp, Material, NestingConstraints, NestingSettings, PackerKind, Part, PartCatalog,
    PartGeometry, ScheduledPart, SheetDef, SheetMargins, Spacing, ToolCatalog,
};
use turnest::geometry::primitives::{Point, Rect};
use turnest::geometry::{Entity, Rotation};
use turnest::nest::{NestOutcome, Nester, NoProgress};

fn part_from_outline(id: usize, outline: Vec<Point>, w: f32, h: f32) -> Part {
    Part {
        id,
        name: format!("part_{id}"),
        geometry: PartGeometry {
            entities: vec![Entity::Polyline(outline)],
            bbox: Rect::try_new(0.0, 0.0, w, h).unwrap(),
            width: w,
            height: h,
            render_path: None,
        },
        punches: vec![],
        material: Material {
            name: "DC01".into(),
            thickness: 1.5,
        },
        constraints: NestingConstraints {
            allow_0_180: false,
            allow_90_270: false,
            allow_mirror: false,
            allow_common_line: false,
        },
    }
}

fn square_part(id: usize, size: f32) -> Part {
    part_from_outline(
        id,
        vec![
            Point(0.0, 0.0),
            Point(size, 0.0),
            Point(size, size),
            Point(0.0, size),
            Point(0.0, 0.0),
        ],
        size,
        size,
    )
}

/// 20x20 L: full bottom arm, left vertical arm, 10x10 notch at the top right.
fn l_part(id: usize) -> Part {
    part_from_outline(
        id,
        vec![
            Point(0.0, 0.0),
            Point(20.0, 0.0),
            Point(20.0, 10.0),
            Point(10.0, 10.0),
            Point(10.0, 20.0),
            Point(0.0, 20.0),
            Point(0.0, 0.0),
        ],
        20.0,
        20.0,
    )
}

fn raster_settings(sheets: Vec<SheetDef>) -> NestingSettings {
    NestingSettings {
        sheets,
        spacing: Spacing { x: 0.0, y: 0.0 },
        margins: SheetMargins {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        },
        packer: PackerKind::Raster,
        raster_resolution: 1.0,
        ..NestingSettings::default()
    }
}

fn sheet(id: usize, w: f32, h: f32, quantity: usize) -> SheetDef {
    SheetDef {
        id,
        width: w,
        height: h,
        quantity,
        use_in_nesting: true,
        selected: false,
        material: Material {
            name: "DC01".into(),
            thickness: 1.5,
        },
    }
}

#[test]
fn leftmost_first_places_at_origin() {
    let mut part = square_part(0, 10.0);
    part.constraints = NestingConstraints {
        allow_0_180: true,
        allow_90_270: true,
        allow_mirror: false,
        allow_common_line: false,
    };
    let parts = PartCatalog::new([part]).unwrap();
    let settings = raster_settings(vec![sheet(0, 100.0, 100.0, 1)]);
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(&[ScheduledPart::new(0, 1)], &mut NoProgress)
        .unwrap();

    assert_eq!(result.outcome, NestOutcome::Complete);
    let p = &result.sheets[0].placed[0];
    assert_eq!((p.x, p.y), (0.0, 0.0));
    assert_eq!(p.rotation, Rotation::R0);
}

#[test]
fn squares_pack_column_first() {
    let parts = PartCatalog::new([square_part(0, 10.0)]).unwrap();
    let settings = raster_settings(vec![sheet(0, 30.0, 30.0, 1)]);
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(&[ScheduledPart::new(0, 4)], &mut NoProgress)
        .unwrap();

    //leftmost-first: the first column fills bottom to top before x advances
    assert_eq!(
        result.sheets[0]
            .placed
            .iter()
            .map(|p| (p.x, p.y))
            .collect::<Vec<_>>(),
        vec![(0.0, 0.0), (0.0, 10.0), (0.0, 20.0), (10.0, 0.0)]
    );
}

#[test]
fn square_nests_into_l_notch() {
    //shape-awareness: the 10x10 square lands inside the L's notch, which the
    //bounding-rectangle strategy could never do on a 20x20 sheet
    let parts = PartCatalog::new([l_part(0), square_part(1, 10.0)]).unwrap();
    let settings = raster_settings(vec![sheet(0, 20.0, 20.0, 1)]);
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(
            &[ScheduledPart::new(0, 1), ScheduledPart::new(1, 1)],
            &mut NoProgress,
        )
        .unwrap();

    assert_eq!(result.outcome, NestOutcome::Complete);
    assert_eq!(result.sheets.len(), 1);
    let placed = &result.sheets[0].placed;
    assert_eq!(placed.len(), 2);
    //the L occupies the whole sheet footprint, the square its notch
    assert_eq!((placed[0].x, placed[0].y), (0.0, 0.0));
    assert_eq!((placed[1].x, placed[1].y), (10.0, 10.0));
}

#[test]
fn spacing_dilation_keeps_parts_apart() {
    let parts = PartCatalog::new([square_part(0, 10.0)]).unwrap();
    let mut settings = raster_settings(vec![sheet(0, 100.0, 100.0, 1)]);
    settings.spacing = Spacing { x: 3.0, y: 3.0 };
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(&[ScheduledPart::new(0, 2)], &mut NoProgress)
        .unwrap();

    let placed = &result.sheets[0].placed;
    assert_eq!((placed[0].x, placed[0].y), (0.0, 0.0));
    //second square is pushed up by the 3mm dilation margin
    assert_eq!((placed[1].x, placed[1].y), (0.0, 13.0));
}

#[test]
fn clamp_band_shifts_placement_around_it() {
    let parts = PartCatalog::new([part_from_outline(
        0,
        vec![
            Point(0.0, 0.0),
            Point(60.0, 0.0),
            Point(60.0, 40.0),
            Point(0.0, 40.0),
            Point(0.0, 0.0),
        ],
        60.0,
        40.0,
    )])
    .unwrap();
    let mut settings = raster_settings(vec![sheet(0, 200.0, 40.0, 1)]);
    settings.clamps = vec![Clamp {
        x: 50.0,
        width: 20.0,
        depth: 40.0,
    }];
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(&[ScheduledPart::new(0, 1)], &mut NoProgress)
        .unwrap();

    //the part spans 60mm and cannot sit left of the 40..60 clamp band
    let p = &result.sheets[0].placed[0];
    assert_eq!((p.x, p.y), (60.0, 0.0));
}

#[test]
fn raster_and_rect_agree_on_plain_rectangles() {
    let make = |packer| {
        let parts = PartCatalog::new([square_part(0, 25.0)]).unwrap();
        let mut settings = raster_settings(vec![sheet(0, 100.0, 100.0, 1)]);
        settings.packer = packer;
        let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();
        nester
            .run(&[ScheduledPart::new(0, 4)], &mut NoProgress)
            .unwrap()
    };

    let raster = make(PackerKind::Raster);
    let rect = make(PackerKind::Rectangle);
    assert_eq!(raster.placed_count, 4);
    assert_eq!(rect.placed_count, 4);
    assert_eq!(raster.outcome, NestOutcome::Complete);
    assert_eq!(rect.outcome, NestOutcome::Complete);
}

#[test]
fn degenerate_geometry_nests_as_a_point() {
    //a part with no entities rasterizes to an empty mask and does not block
    //the sheet; a documented sharp edge, not an error
    let mut ghost = square_part(0, 10.0);
    ghost.geometry.entities.clear();
    let parts = PartCatalog::new([ghost, square_part(1, 10.0)]).unwrap();
    let settings = raster_settings(vec![sheet(0, 100.0, 100.0, 1)]);
    let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();

    let result = nester
        .run(
            &[ScheduledPart::new(0, 1), ScheduledPart::new(1, 1)],
            &mut NoProgress,
        )
        .unwrap();

    assert_eq!(result.outcome, NestOutcome::Complete);
    assert_eq!(result.placed_count, 2);
}

#[test]
fn raster_runs_are_deterministic() {
    let run = || {
        let parts = PartCatalog::new([l_part(0), square_part(1, 10.0)]).unwrap();
        let settings = raster_settings(vec![sheet(0, 60.0, 60.0, 2)]);
        let nester = Nester::new(parts, ToolCatalog::default(), settings).unwrap();
        nester
            .run(
                &[ScheduledPart::new(0, 3), ScheduledPart::new(1, 5)],
                &mut NoProgress,
            )
            .unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.placed_count, b.placed_count);
    for (sa, sb) in a.sheets.iter().zip(&b.sheets) {
        let pa: Vec<_> = sa.placed.iter().map(|p| (p.x, p.y, p.rotation)).collect();
        let pb: Vec<_> = sb.placed.iter().map(|p| (p.x, p.y, p.rotation)).collect();
        assert_eq!(pa, pb);
    }
}
