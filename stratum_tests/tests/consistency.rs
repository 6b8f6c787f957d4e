// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use stratum::{
    fill_color, rgba8, CanvasTransform, ColorScheme, ElevationRange, Point, Rect, RenderMode,
    Size, VectorRenderer,
};
use stratum_dev::terraced_hill;

use crate::util::{raster_config, raster_renderer, svg_config, svg_hex};

#[test]
fn consistency_backends_share_fill_colors() {
    let layers = terraced_hill();
    let range = ElevationRange::new(100.0, 300.0);
    let color = fill_color(200.0, range, ColorScheme::Terrain, RenderMode::FullColor).unwrap();

    let (svg, _) = VectorRenderer::new(svg_config())
        .render_layer(&layers, 1)
        .unwrap();
    assert!(
        svg.contains(&format!("fill=\"{}\"", svg_hex(color))),
        "vector fill of the middle terrace"
    );

    let (canvas, _) = raster_renderer(raster_config())
        .render_layer(&layers, 1)
        .unwrap();
    // Pixel (50, 150) is geographic (25, 25): on the middle terrace, outside its pit.
    assert_eq!(canvas.pixel(50, 150), Some(rgba8(color)));
}

#[test]
fn consistency_colors_span_the_whole_stack() {
    let layers = terraced_hill();
    let renderer = VectorRenderer::new(svg_config());
    let (lowest, _) = renderer.render_layer(&layers, 0).unwrap();
    let (highest, _) = renderer.render_layer(&layers, 2).unwrap();
    let low = svg_hex(ColorScheme::Terrain.at(0.0));
    let high = svg_hex(ColorScheme::Terrain.at(1.0));
    assert!(lowest.contains(&format!("fill=\"{low}\"")), "lowest layer maps to the bottom of the scheme");
    assert!(highest.contains(&format!("fill=\"{high}\"")), "highest layer maps to the top of the scheme");
}

/// The fill color of the first polygon in each layer group of an SVG document.
fn layer_group_fills(svg: &str) -> Vec<String> {
    svg.split("<g id=\"layer_")
        .skip(1)
        .map(|group| {
            let group = &group[..group.find("</g>").unwrap()];
            let at = group.find(" fill=\"#").unwrap() + " fill=\"".len();
            group[at..at + 7].to_string()
        })
        .collect()
}

#[test]
fn consistency_vector_combined_sheet_keeps_layer_colors() {
    let layers = terraced_hill();
    let renderer = VectorRenderer::new(svg_config());
    let (combined, report) = renderer.render_combined(&layers).unwrap();
    assert_eq!(report.layer_number, 0);
    let combined_fills = layer_group_fills(&combined);
    assert_eq!(combined_fills.len(), layers.len());

    let range = ElevationRange::new(100.0, 300.0);
    for (i, layer) in layers.iter().enumerate() {
        let (single, _) = renderer.render_layer(&layers, i).unwrap();
        let single_fills = layer_group_fills(&single);
        assert_eq!(single_fills, [combined_fills[i].clone()], "layer {i}");
        let expected =
            fill_color(layer.elevation, range, ColorScheme::Terrain, RenderMode::FullColor).unwrap();
        assert_eq!(combined_fills[i], svg_hex(expected), "layer {i}");
    }
}

#[test]
fn consistency_raster_combined_image_keeps_layer_colors() {
    let layers = terraced_hill();
    let mut renderer = raster_renderer(raster_config());
    let (combined, _) = renderer.render_combined(&layers).unwrap();
    // One pixel per terrace that no higher terrace covers: geographic
    // (10, 10), (25, 25) and (50, 50) at two pixels per unit, y flipped.
    let samples = [(20, 180), (50, 150), (100, 100)];
    for (i, (x, y)) in samples.into_iter().enumerate() {
        let (single, _) = renderer.render_layer(&layers, i).unwrap();
        let expected = single.pixel(x, y);
        assert_ne!(expected, Some([255, 255, 255, 255]), "layer {i} is filled at ({x}, {y})");
        assert_eq!(combined.pixel(x, y), expected, "layer {i} at ({x}, {y})");
    }
}

#[test]
fn consistency_y_axis_points_down() {
    let transform = CanvasTransform::new(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Size::new(120.0, 120.0),
        10.0,
    );
    assert_eq!(transform.to_canvas(Point::new(0.0, 100.0)), Point::new(10.0, 10.0));
    assert_eq!(transform.to_canvas(Point::new(100.0, 0.0)), Point::new(110.0, 110.0));
    assert_eq!(transform.to_canvas(Point::new(50.0, 25.0)), Point::new(60.0, 85.0));
}
