use image::GrayImage;
use penmaze_core::PixelPoint;

/// A 4-connected region of set pixels in a mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// Pixel count, i.e. the zeroth moment.
    pub area: u32,
    /// First moments, summed pixel coordinates.
    pub sum_x: u64,
    pub sum_y: u64,
    /// Inclusive bounding box `(min, max)`.
    pub bounds: (PixelPoint, PixelPoint),
}

impl Blob {
    /// Centre of mass, truncated to whole pixels.
    pub fn centroid(&self) -> PixelPoint {
        let area = u64::from(self.area.max(1));
        ((self.sum_x / area) as u32, (self.sum_y / area) as u32)
    }

    fn seed(x: u32, y: u32) -> Self {
        Self {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            bounds: ((x, y), (x, y)),
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        let ((min_x, min_y), (max_x, max_y)) = &mut self.bounds;
        *min_x = (*min_x).min(x);
        *min_y = (*min_y).min(y);
        *max_x = (*max_x).max(x);
        *max_y = (*max_y).max(y);
        self.area += 1;
        self.sum_x += u64::from(x);
        self.sum_y += u64::from(y);
    }
}

/// Labels every connected region of non-zero pixels, in scan order of their first pixel.
pub fn find_blobs(mask: &GrayImage) -> Vec<Blob> {
    let (width, height) = mask.dimensions();
    let mut visited = vec![false; width as usize * height as usize];
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let is_set = |x: u32, y: u32| mask.get_pixel(x, y).0[0] != 0;

    let mut blobs = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if visited[index(x, y)] || !is_set(x, y) {
                continue;
            }

            let mut blob = Blob::seed(x, y);
            let mut stack = vec![(x, y)];
            visited[index(x, y)] = true;

            while let Some((cx, cy)) = stack.pop() {
                blob.add(cx, cy);

                for (dx, dy) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
                    let (Some(nx), Some(ny)) = (cx.checked_add_signed(dx), cy.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    if nx >= width || ny >= height {
                        continue;
                    }
                    if !visited[index(nx, ny)] && is_set(nx, ny) {
                        visited[index(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            blobs.push(blob);
        }
    }

    blobs
}

/// The blob with the most pixels. Ties go to the one found first.
pub fn largest_blob(mask: &GrayImage) -> Option<Blob> {
    find_blobs(mask)
        .into_iter()
        .reduce(|best, blob| if blob.area > best.area { blob } else { best })
}
