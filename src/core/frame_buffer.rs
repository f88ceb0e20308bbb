/// RGB8 frame, row-major, top row first. Starts out black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// RGB values in [0, 255], three bytes per pixel
    pub color_buffer: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            color_buffer: vec![0; width * height * 3],
        }
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 3
    }

    /// Writes one pixel; coordinates outside the frame are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.color_buffer[i..i + 3].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.color_buffer[i],
            self.color_buffer[i + 1],
            self.color_buffer[i + 2],
        ])
    }

    pub fn get_color_buffer_bytes(&self) -> &[u8] {
        &self.color_buffer
    }

    /// RGBA copy for display surfaces that want an alpha channel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color_buffer
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_black() {
        let frame = FrameBuffer::new(4, 3);
        assert_eq!(frame.color_buffer.len(), 36);
        assert!(frame.color_buffer.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_pixels_are_row_major() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.set_pixel(1, 2, [9, 8, 7]);
        assert_eq!(&frame.color_buffer[(2 * 4 + 1) * 3..(2 * 4 + 2) * 3], &[9, 8, 7]);
        assert_eq!(frame.get_pixel(1, 2), Some([9, 8, 7]));
        assert_eq!(frame.get_pixel(4, 0), None);

        // Out of range writes are dropped
        let before = frame.clone();
        frame.set_pixel(10, 10, [1, 1, 1]);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_rgba_conversion() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.set_pixel(1, 0, [1, 2, 3]);
        assert_eq!(frame.to_rgba_bytes(), vec![0, 0, 0, 255, 1, 2, 3, 255]);
    }
}
