//! Scenario tests for the overlap-add splice buffer

use approx::assert_abs_diff_eq;
use frame_ring::{
    CrossfadeCurve, FramingConfig, FramingRingBuffer, OlaConfig, OlaRingBuffer, SpliceMode,
};

fn signal(len: usize) -> Vec<f64> {
    (0..len).map(|p| 1.0 + 0.001 * p as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_then_splice_reconstruction() {
        let (frame, hop, overlap) = (32, 24, 8);
        let mut framer = FramingRingBuffer::<f64>::new(FramingConfig::new(1, 256, frame, hop)).unwrap();
        let config = OlaConfig::new(1, 256, 12, overlap).with_curve(CrossfadeCurve::Linear);
        let mut splicer = OlaRingBuffer::<f64>::new(config).unwrap();

        let input = signal(2000);
        let mut output = Vec::new();
        let mut frame_buf = Vec::new();
        let mut out = Vec::new();

        for chunk in input.chunks(50) {
            assert!(framer.write(&[chunk]).unwrap());
            while framer.read(&mut frame_buf, 1) {
                assert!(splicer.write(&frame_buf).unwrap());
                while splicer.read(&mut out, 1) {
                    output.extend_from_slice(&out[0]);
                }
            }
        }
        assert!(output.len() > 1900);

        let gain = splicer.crossfade_table().to_vec();
        for (p, &y) in output.iter().enumerate() {
            let (k, i) = (p / hop, p % hop);
            let expected = match (k, i < overlap) {
                (_, false) => input[p],
                (0, true) => input[p] * gain[i],
                (_, true) => input[p] * (gain[i] + gain[overlap - 1 - i]),
            };
            assert_abs_diff_eq!(y, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_channels_are_spliced_independently() {
        let config = OlaConfig::new(3, 128, 16, 4);
        let mut buffer = OlaRingBuffer::<f32>::new(config).unwrap();
        let block: Vec<Vec<f32>> = (0..3).map(|c| vec![c as f32 + 1.0; 20]).collect();

        assert!(buffer.write(&block).unwrap());
        assert!(buffer.write(&block).unwrap());
        let window = buffer.read_array(0).unwrap();
        assert_eq!(window.dim(), (3, 32));

        for c in 0..3 {
            let level = c as f32 + 1.0;
            let base = window[[0, 10]];
            assert_eq!(window[[c, 10]], level * base);
            assert_abs_diff_eq!(window[[c, 17]], level * window[[0, 17]], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_backpressure_cycle_stays_bounded() {
        let config = OlaConfig::new(2, 96, 8, 6).with_curve(CrossfadeCurve::EqualPowerSine);
        let mut buffer = OlaRingBuffer::<f32>::new(config).unwrap();
        let mut out = Vec::new();
        let sizes = [13, 40, 25, 17, 60];

        for round in 0..200 {
            let len = sizes[round % sizes.len()];
            let block = vec![vec![0.5f32; len]; 2];
            let space_before = buffer.available_space();
            let accepted = buffer.write(&block).unwrap();
            assert_eq!(accepted, len - 6 <= space_before);
            assert!(buffer.available_units() <= buffer.capacity());

            if !accepted {
                assert!(buffer.read(&mut out, 0));
                for channel in out.iter() {
                    assert!(channel.iter().all(|&x| (0.0..=1.0).contains(&x)));
                }
            }
        }
    }

    #[test]
    fn test_relaxed_mode_accepts_overlap_only_blocks() {
        let config = OlaConfig::new(1, 64, 4, 8).with_splice_mode(SpliceMode::Relaxed);
        let mut buffer = OlaRingBuffer::<f64>::new(config).unwrap();

        assert!(buffer.write(&[vec![1.0; 8]]).unwrap());
        assert!(buffer.is_empty());
        assert!(buffer.write(&[vec![1.0; 12]]).unwrap());
        assert_eq!(buffer.available_units(), 4);
        assert!(!buffer.write(&[vec![1.0; 7]]).unwrap());
    }

    #[test]
    fn test_clear_restarts_from_silence() {
        let config = OlaConfig::new(1, 64, 8, 4).with_curve(CrossfadeCurve::Linear);
        let mut buffer = OlaRingBuffer::<f64>::new(config).unwrap();
        let mut out = Vec::new();

        buffer.write(&[vec![3.0; 20]]).unwrap();
        buffer.clear();
        assert!(!buffer.read(&mut out, 0));

        buffer.write(&[vec![1.0; 12]]).unwrap();
        assert!(buffer.read(&mut out, 1));
        assert_eq!(out[0], vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0, 1.0]);
    }
}
