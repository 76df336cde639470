//! Landmark overlay rendering for operator feedback in the live path.

use std::io::Cursor;

use image::{ImageOutputFormat, RgbImage};

use super::types::{HandLandmarks, PoseLandmarks};
use crate::core::video::Frame;

/// Bone topology of a 21-point hand (wrist, thumb, index, middle, ring,
/// pinky chains plus the palm edge).
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (0, 17),
];

mod colors {
    /// Hand keypoint dots
    pub const HAND_POINT: [u8; 3] = [0, 255, 0];
    /// Hand bones
    pub const HAND_BONE: [u8; 3] = [0, 0, 255];
    /// Elbow markers
    pub const ELBOW: [u8; 3] = [255, 0, 0];
}

const POINT_RADIUS: i32 = 4;
const ELBOW_RADIUS: i32 = 6;

/// Copy the frame and draw hand bones, hand keypoints and elbow markers
/// into it.
pub fn draw_landmarks(
    frame: &Frame,
    hands: &[HandLandmarks],
    pose: Option<&PoseLandmarks>,
) -> Frame {
    let mut out = frame.clone();
    let w = frame.width as f32;
    let h = frame.height as f32;

    for hand in hands {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(pa), Some(pb)) = (hand.points.get(a), hand.points.get(b)) {
                draw_segment(
                    &mut out,
                    (pa.x * w) as i32,
                    (pa.y * h) as i32,
                    (pb.x * w) as i32,
                    (pb.y * h) as i32,
                    colors::HAND_BONE,
                );
            }
        }
        for point in &hand.points {
            fill_circle(
                &mut out,
                (point.x * w) as i32,
                (point.y * h) as i32,
                POINT_RADIUS,
                colors::HAND_POINT,
            );
        }
    }

    if let Some(pose) = pose {
        for elbow in [pose.left_elbow(), pose.right_elbow()].into_iter().flatten() {
            fill_circle(
                &mut out,
                (elbow.x * w) as i32,
                (elbow.y * h) as i32,
                ELBOW_RADIUS,
                colors::ELBOW,
            );
        }
    }

    out
}

/// JPEG-encode an RGBA frame. Returns an empty buffer when the frame
/// cannot be encoded.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Vec<u8> {
    if frame.data.is_empty() || frame.width == 0 || frame.height == 0 {
        return vec![];
    }

    let rgb: Vec<u8> = frame
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let img = match RgbImage::from_raw(frame.width, frame.height, rgb) {
        Some(img) => img,
        None => return vec![],
    };

    let mut buffer = Cursor::new(Vec::new());
    if img.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality)).is_ok() {
        buffer.into_inner()
    } else {
        vec![]
    }
}

fn set_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let idx = (y as usize * frame.width as usize + x as usize) * 4;
    frame.data[idx] = color[0];
    frame.data[idx + 1] = color[1];
    frame.data[idx + 2] = color[2];
}

fn fill_circle(frame: &mut Frame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                set_pixel(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_segment(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 3]) {
    // Bresenham
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        set_pixel(frame, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::landmark::types::{Landmark, HAND_LANDMARK_COUNT, POSE_LANDMARK_COUNT};

    fn blank_frame(width: u32, height: u32) -> Frame {
        let mut data = vec![0u8; (width * height * 4) as usize];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Frame::new(width, height, data, 0, 0).unwrap()
    }

    fn centered_hand() -> HandLandmarks {
        HandLandmarks::new(vec![Landmark::new(0.5, 0.5); HAND_LANDMARK_COUNT])
    }

    #[test]
    fn test_draw_marks_pixels() {
        let frame = blank_frame(64, 64);
        let drawn = draw_landmarks(&frame, &[centered_hand()], None);

        assert_ne!(frame.data, drawn.data);
        // center pixel carries the keypoint color
        let idx = (32 * 64 + 32) * 4;
        assert_eq!(&drawn.data[idx..idx + 3], &colors::HAND_POINT);
    }

    #[test]
    fn test_draw_elbows() {
        let mut points = vec![Landmark::new(-1.0, -1.0); POSE_LANDMARK_COUNT];
        points[super::super::types::LEFT_ELBOW] = Landmark::new(0.25, 0.25);
        points[super::super::types::RIGHT_ELBOW] = Landmark::new(0.75, 0.75);
        let pose = PoseLandmarks::new(points);

        let frame = blank_frame(64, 64);
        let drawn = draw_landmarks(&frame, &[], Some(&pose));

        let idx = (16 * 64 + 16) * 4;
        assert_eq!(&drawn.data[idx..idx + 3], &colors::ELBOW);
    }

    #[test]
    fn test_offscreen_landmarks_ignored() {
        let frame = blank_frame(16, 16);
        let hand = HandLandmarks::new(vec![Landmark::new(4.0, 4.0); HAND_LANDMARK_COUNT]);
        // must not panic on out-of-bounds coordinates
        let _ = draw_landmarks(&frame, &[hand], None);
    }

    #[test]
    fn test_encode_jpeg_produces_data() {
        let frame = blank_frame(32, 32);
        let jpeg = encode_jpeg(&frame, 80);

        assert!(!jpeg.is_empty());
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_empty_frame() {
        let frame = Frame {
            width: 0,
            height: 0,
            data: vec![],
            timestamp: std::time::Duration::ZERO,
            frame_number: 0,
        };
        assert!(encode_jpeg(&frame, 80).is_empty());
    }
}
