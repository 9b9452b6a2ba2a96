use choropleth_shared::CountyShape;

const GRID_COLS: usize = 50;
const GRID_ROWS: usize = 50;

/// A flat 2D grid over screen space for county hit-testing.
/// Rebuilt only when the scene geometry changes (after a load).
pub struct SpatialGrid {
    cells: Vec<Vec<usize>>,
    min_x: f64,
    min_y: f64,
    cell_w: f64,
    cell_h: f64,
}

impl SpatialGrid {
    pub fn build(counties: &[CountyShape]) -> Self {
        let bounds: Vec<_> = counties
            .iter()
            .enumerate()
            .filter_map(|(idx, county)| county.shape.bounds().map(|rect| (idx, rect)))
            .collect();
        if bounds.is_empty() {
            return Self {
                cells: Vec::new(),
                min_x: 0.0,
                min_y: 0.0,
                cell_w: 1.0,
                cell_h: 1.0,
            };
        }

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (_, rect) in &bounds {
            min_x = min_x.min(rect.min().x);
            min_y = min_y.min(rect.min().y);
            max_x = max_x.max(rect.max().x);
            max_y = max_y.max(rect.max().y);
        }

        // Pad so points on the outer edge still land in a cell
        min_x -= 1.0;
        min_y -= 1.0;
        max_x += 1.0;
        max_y += 1.0;

        let cell_w = (max_x - min_x) / GRID_COLS as f64;
        let cell_h = (max_y - min_y) / GRID_ROWS as f64;

        let mut cells = vec![Vec::new(); GRID_COLS * GRID_ROWS];
        for (idx, rect) in bounds {
            let col_start = ((rect.min().x - min_x) / cell_w).floor().max(0.0) as usize;
            let col_end = ((rect.max().x - min_x) / cell_w).ceil().min(GRID_COLS as f64) as usize;
            let row_start = ((rect.min().y - min_y) / cell_h).floor().max(0.0) as usize;
            let row_end = ((rect.max().y - min_y) / cell_h).ceil().min(GRID_ROWS as f64) as usize;

            for row in row_start..row_end {
                for col in col_start..col_end {
                    cells[row * GRID_COLS + col].push(idx);
                }
            }
        }

        Self {
            cells,
            min_x,
            min_y,
            cell_w,
            cell_h,
        }
    }

    /// Index of the hoverable county under a screen point. Styles are read
    /// from `counties` at query time, so the grid survives repaints.
    pub fn find_at(&self, counties: &[CountyShape], x: f64, y: f64) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }
        let col = ((x - self.min_x) / self.cell_w).floor();
        let row = ((y - self.min_y) / self.cell_h).floor();
        if col < 0.0 || row < 0.0 || col >= GRID_COLS as f64 || row >= GRID_ROWS as f64 {
            return None;
        }

        // Later counties are drawn on top, so they win ties.
        self.cells[row as usize * GRID_COLS + col as usize]
            .iter()
            .rev()
            .copied()
            .find(|&idx| {
                counties
                    .get(idx)
                    .is_some_and(|county| county.is_hoverable() && county.shape.contains(x, y))
            })
    }
}

#[cfg(test)]
mod tests {
    use choropleth_shared::controller::CountyStyle;
    use choropleth_shared::path::ProjectedShape;
    use choropleth_shared::projection::Projection;
    use choropleth_shared::{Paint, Rgb};
    use geo::{MultiPolygon, polygon};

    use super::*;

    struct Flat;

    impl Projection for Flat {
        fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
            Some((lon, lat))
        }
    }

    fn square(id: &str, x: f64, y: f64, size: f64, fill: Paint) -> CountyShape {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]]);
        CountyShape {
            id: Some(id.to_string()),
            classified: !fill.is_none(),
            shape: ProjectedShape::project(&geometry, &Flat),
            style: CountyStyle { fill, stroke: fill },
        }
    }

    #[test]
    fn finds_the_county_under_the_point() {
        let red = Paint::Color(Rgb(0xd7, 0x30, 0x1f));
        let counties = vec![
            square("32003", 0.0, 0.0, 10.0, red),
            square("32001", 20.0, 0.0, 10.0, red),
        ];
        let grid = SpatialGrid::build(&counties);
        assert_eq!(grid.find_at(&counties, 5.0, 5.0), Some(0));
        assert_eq!(grid.find_at(&counties, 25.0, 5.0), Some(1));
        assert_eq!(grid.find_at(&counties, 15.0, 5.0), None);
        assert_eq!(grid.find_at(&counties, -50.0, 5.0), None);
    }

    #[test]
    fn unpainted_counties_are_not_hit() {
        let counties = vec![square("06037", 0.0, 0.0, 10.0, Paint::None)];
        let grid = SpatialGrid::build(&counties);
        assert_eq!(grid.find_at(&counties, 5.0, 5.0), None);
    }

    #[test]
    fn empty_scene() {
        let grid = SpatialGrid::build(&[]);
        assert_eq!(grid.find_at(&[], 0.0, 0.0), None);
    }
}
