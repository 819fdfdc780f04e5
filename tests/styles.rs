use voronoi_viz::mapper::ScreenPoint;
use voronoi_viz::params::MosaicConfig;
use voronoi_viz::style::blob::{self, polygon_area, soften};
use voronoi_viz::style::mosaic::{label_size, palette_index, MosaicStyle};
use voronoi_viz::style::overlay::{size_factors, TextAlign};
use voronoi_viz::style::shader::{self, fragment_source, ShaderUniforms, UniformValue};
use voronoi_viz::style::FrameContext;
use voronoi_viz::{RenderMode, RenderParameters, Rgb};

fn ctx(params: &RenderParameters, width: f64, height: f64, frame: u64, now_ms: f64) -> FrameContext<'_> {
    FrameContext {
        width,
        height,
        frame,
        now_ms,
        params,
    }
}

#[test]
fn fragment_program_embeds_field_constants() {
    let src = fragment_source();
    assert!(!src.contains("// @voronoi"));
    assert!(src.contains("vec4 voronoi(vec2 uv, vec2 t, float mt)"));
    for needle in ["1234.5678", "567.8901", "12345.67", "0.49"] {
        assert!(src.contains(needle), "missing {needle}");
    }
}

#[test]
fn every_uniform_is_declared_and_one_mode_is_set() {
    let src = fragment_source();
    for mode in RenderMode::ALL {
        let params = RenderParameters {
            mode,
            ..RenderParameters::default()
        };
        let uniforms = ShaderUniforms::new(&params, 10, 800.0, 600.0);
        let entries = uniforms.entries();
        for (name, _) in &entries {
            assert!(src.contains(&format!(" {name};")), "{name} not declared");
        }
        let set: Vec<_> = entries
            .iter()
            .filter(|(name, v)| {
                RenderMode::ALL.iter().any(|m| m.uniform_name() == *name) && *v == UniformValue::Bool(true)
            })
            .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].0, mode.uniform_name());
    }
}

#[test]
fn shader_uniforms_follow_parameters() {
    let params = RenderParameters {
        smooth: 0.0,
        ..RenderParameters::default()
    };
    let u = ShaderUniforms::new(&params, 42, 800.0, 600.0);
    assert_eq!(u.resolution, [800.0, 600.0]);
    assert_eq!(u.time, 42.0);
    assert_eq!(u.smooth, 0.01);
    assert_eq!(u.edge_color, Rgb::from_u8(121, 76, 212).to_array());
}

#[test]
fn shader_labels_sit_right_of_their_points() {
    let params = RenderParameters::default();
    let frame = shader::render(&ctx(&params, 800.0, 600.0, 1, 0.0)).unwrap();
    assert!(!frame.labels.is_empty());
    assert!(frame.labels.len() <= params.overlay_cells);
    for label in &frame.labels {
        assert_eq!(label.text, "cciD");
        assert_eq!(label.align, TextAlign::LeftBaseline);
        assert_eq!(label.size, 24.0);
    }
}

#[test]
fn blob_frame_has_one_outline_per_dot() {
    let params = RenderParameters::default();
    let frame = blob::render(&ctx(&params, 800.0, 600.0, 3, 0.0)).unwrap();
    assert!(!frame.cells.is_empty());
    assert_eq!(frame.dots.len(), frame.cells.len());
    assert_eq!(frame.labels.len(), frame.cells.len());
    for (cell, dot) in frame.cells.iter().zip(&frame.dots) {
        assert_eq!(cell.site, dot.center);
        assert!(cell.outline.len() >= 3, "{:?}", cell.lattice);
        assert_eq!(cell.fill, Rgb::WHITE);
        assert_eq!(cell.stroke, Some(params.edge_color));
    }
    for (label, dot) in frame.labels.iter().zip(&frame.dots) {
        assert!((label.anchor.x - (dot.center.x + dot.diameter * 0.5 + 3.0)).abs() < 1e-9);
        assert_eq!(label.anchor.y, dot.center.y);
        assert!(label.size >= params.text_size * 0.8 && label.size <= params.text_size * 1.6);
    }
}

#[test]
fn larger_cells_get_larger_marks() {
    let params = RenderParameters::default();
    let frame = blob::render(&ctx(&params, 800.0, 600.0, 3, 0.0)).unwrap();
    let marks: Vec<_> = frame
        .cells
        .iter()
        .zip(&frame.dots)
        .zip(&frame.labels)
        .map(|((cell, dot), label)| (cell.area, dot.diameter, label.size))
        .collect();
    for &(area_a, dot_a, text_a) in &marks {
        for &(area_b, dot_b, text_b) in &marks {
            if area_a > area_b {
                assert!(dot_a >= dot_b, "area {area_a} > {area_b} but dot {dot_a} < {dot_b}");
                assert!(text_a >= text_b);
            }
        }
    }
    let min = marks.iter().map(|m| m.1).fold(f64::INFINITY, f64::min);
    let max = marks.iter().map(|m| m.1).fold(0.0, f64::max);
    assert!(max > min, "every dot has the same size");
    assert!(min >= params.dot_size * 0.5 && max <= params.dot_size * 2.0);
}

#[test]
fn size_factors_follow_square_root_of_relative_area() {
    let f = size_factors(&[100.0, 400.0, 100.0, 0.0]);
    // Mean area 150; the empty cell counts as average.
    assert!((f[0] - (100.0_f64 / 150.0).sqrt()).abs() < 1e-12);
    assert!((f[1] - (400.0_f64 / 150.0).sqrt()).abs() < 1e-12);
    assert_eq!(f[3], 1.0);
    // Clamped to [0.5, 2].
    let f = size_factors(&[1.0, 1000.0, 1000.0, 1000.0]);
    assert_eq!(f[0], 0.5);
    let f = size_factors(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 100.0]);
    assert_eq!(f[9], 2.0);
    assert_eq!(size_factors(&[0.0, 0.0]), vec![1.0, 1.0]);
}

#[test]
fn shoelace_area_of_outlines() {
    let square = [
        ScreenPoint::new(0.0, 0.0),
        ScreenPoint::new(10.0, 0.0),
        ScreenPoint::new(10.0, 10.0),
        ScreenPoint::new(0.0, 10.0),
    ];
    assert_eq!(polygon_area(&square), 100.0);
    let reversed: Vec<_> = square.iter().rev().copied().collect();
    assert_eq!(polygon_area(&reversed), 100.0);
    assert_eq!(polygon_area(&square[..2]), 0.0);
}

#[test]
fn blob_modes_and_toggles() {
    let params = RenderParameters {
        mode: RenderMode::Grayscale,
        point: false,
        edge: false,
        ..RenderParameters::default()
    };
    let frame = blob::render(&ctx(&params, 640.0, 480.0, 1, 0.0)).unwrap();
    assert!(frame.dots.is_empty() && frame.labels.is_empty());
    for cell in &frame.cells {
        assert_eq!(cell.stroke, None);
        assert_eq!(cell.fill, Rgb::gray(cell.lattice.hash1()));
    }

    let contour = RenderParameters {
        contour: true,
        mode: RenderMode::Colorful,
        ..RenderParameters::default()
    };
    for cell in blob::render(&ctx(&contour, 640.0, 480.0, 1, 0.0)).unwrap().cells {
        assert!(cell.fill.r == cell.fill.g && cell.fill.g == cell.fill.b);
    }
}

#[test]
fn soften_pulls_vertices_toward_the_site() {
    let site = ScreenPoint::new(0.0, 0.0);
    let square = [
        ScreenPoint::new(10.0, 0.0),
        ScreenPoint::new(0.0, 10.0),
        ScreenPoint::new(-10.0, 0.0),
        ScreenPoint::new(0.0, -10.0),
    ];
    let soft = soften(&square, site, 2.0);
    assert_eq!(soft[0], ScreenPoint::new(8.0, 0.0));
    assert_eq!(soft[3], ScreenPoint::new(0.0, -8.0));
    // Too short to be a polygon: returned unchanged.
    assert_eq!(soften(&square[..2], site, 2.0), square[..2].to_vec());
}

#[test]
fn palette_and_label_sizes() {
    assert_eq!(palette_index(0.0), 0);
    assert_eq!(palette_index(0.3), 1);
    assert_eq!(palette_index(0.99), 3);
    assert_eq!(palette_index(f64::NAN), 2);
    assert_eq!(label_size(80), 52.0);
    assert_eq!(label_size(40), 20.0);
    assert_eq!(label_size(20), 8.0);
    assert_eq!(label_size(10), 8.0);
    assert_eq!(label_size(200), 60.0);
}

#[test]
fn uniform_mosaic_tiles_the_canvas() {
    let mut style = MosaicStyle::new(MosaicConfig::uniform(20, &["x"])).unwrap();
    let params = RenderParameters::default();
    let frame = style.render(&ctx(&params, 100.0, 60.0, 1, 0.0)).unwrap();
    assert_eq!(frame.tiles.len(), 15);
    for tile in &frame.tiles {
        assert_eq!(tile.size, 20);
        assert_eq!(tile.label.text, "x");
        assert_eq!(tile.label.align, TextAlign::Center);
        assert_eq!(tile.label.anchor, ScreenPoint::new(tile.x + 10.0, tile.y + 10.0));
    }
}

#[test]
fn multi_size_mosaic_covers_every_small_position_once() {
    let config = MosaicConfig::default();
    let palette = config.palette;
    let mut style = MosaicStyle::new(config).unwrap();
    let params = RenderParameters::default();
    let (w, h) = (480.0, 320.0);
    let frame = style.render(&ctx(&params, w, h, 7, 0.0)).unwrap();

    for pair in frame.tiles.windows(2) {
        assert!(pair[0].size <= pair[1].size);
    }
    let inside = |x: f64, y: f64, t: &voronoi_viz::style::mosaic::Tile| {
        x >= t.x && x < t.x + t.size as f64 && y >= t.y && y < t.y + t.size as f64
    };
    let mut y = 0.0;
    while y < h {
        let mut x = 0.0;
        while x < w {
            let small = frame.tiles.iter().filter(|t| t.size == 20 && t.x == x && t.y == y).count();
            let large = frame.tiles.iter().any(|t| t.size > 20 && inside(x, y, t));
            assert!(small + large as usize >= 1, "gap at ({x}, {y})");
            assert!(!(small > 0 && large), "small tile under a large one at ({x}, {y})");
            x += 20.0;
        }
        y += 20.0;
    }
    for tile in &frame.tiles {
        assert!(palette.contains(&tile.color));
        assert!(!tile.label.text.is_empty());
    }
}

#[test]
fn tile_sizes_come_from_the_configured_list() {
    let style = MosaicStyle::new(MosaicConfig::default()).unwrap();
    for i in -20..20 {
        for j in -20..20 {
            let size = style.tile_size_for(voronoi_viz::LatticeCoord::new(i, j));
            assert!([80, 40, 20].contains(&size));
        }
    }
}

#[test]
fn mosaic_sections_follow_host_time() {
    let mut style = MosaicStyle::new(MosaicConfig::default()).unwrap();
    let params = RenderParameters::default();
    assert_eq!(style.render(&ctx(&params, 100.0, 100.0, 1, 0.0)).unwrap().section, 0);
    assert_eq!(style.render(&ctx(&params, 100.0, 100.0, 2, 2000.0)).unwrap().section, 0);
    assert_eq!(style.render(&ctx(&params, 100.0, 100.0, 3, 3000.0)).unwrap().section, 1);
}

#[test]
fn bad_mosaic_config_is_rejected() {
    let config = MosaicConfig {
        grid_sizes: Vec::new(),
        ..MosaicConfig::default()
    };
    assert!(MosaicStyle::new(config).is_err());
    let config = MosaicConfig {
        grid_sizes: vec![20, 0],
        ..MosaicConfig::default()
    };
    assert!(MosaicStyle::new(config).is_err());
}

#[test]
fn larger_tile_sizes_must_be_multiples_of_the_smallest() {
    let config = MosaicConfig {
        grid_sizes: vec![30, 20],
        ..MosaicConfig::default()
    };
    assert!(matches!(
        MosaicStyle::new(config),
        Err(voronoi_viz::Error::InvalidParameter { name: "GridSizes", .. })
    ));
    let config = MosaicConfig {
        grid_sizes: vec![60, 20, 40],
        ..MosaicConfig::default()
    };
    assert!(MosaicStyle::new(config).is_ok());
}
