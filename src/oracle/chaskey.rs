//! Chaskey-12 permutation-based MAC
//!
//! 128-bit key, 128-bit tag, twelve rounds of the ARX permutation.
//! All words are little-endian.

const ROUNDS: usize = 12;

/// A keyed Chaskey-12 instance with its two derived subkeys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chaskey {
    key: [u32; 4],
    k1: [u32; 4],
    k2: [u32; 4],
}

fn times_two(input: [u32; 4]) -> [u32; 4] {
    let carry = if input[3] >> 31 == 1 { 0x87 } else { 0 };
    [
        (input[0] << 1) ^ carry,
        (input[1] << 1) | (input[0] >> 31),
        (input[2] << 1) | (input[1] >> 31),
        (input[3] << 1) | (input[2] >> 31),
    ]
}

fn permute(v: &mut [u32; 4]) {
    for _ in 0..ROUNDS {
        v[0] = v[0].wrapping_add(v[1]);
        v[1] = v[1].rotate_left(5) ^ v[0];
        v[0] = v[0].rotate_left(16);
        v[2] = v[2].wrapping_add(v[3]);
        v[3] = v[3].rotate_left(8) ^ v[2];
        v[0] = v[0].wrapping_add(v[3]);
        v[3] = v[3].rotate_left(13) ^ v[0];
        v[2] = v[2].wrapping_add(v[1]);
        v[1] = v[1].rotate_left(7) ^ v[2];
        v[2] = v[2].rotate_left(16);
    }
}

fn xor_words(v: &mut [u32; 4], other: &[u32; 4]) {
    for (word, rhs) in v.iter_mut().zip(other) {
        *word ^= rhs;
    }
}

fn block_words(block: &[u8]) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

impl Chaskey {
    pub fn new(key: [u32; 4]) -> Self {
        let k1 = times_two(key);
        let k2 = times_two(k1);
        Chaskey { key, k1, k2 }
    }

    /// Key from two 64-bit halves, low half first
    pub fn from_halves(low: u64, high: u64) -> Self {
        Chaskey::new([
            low as u32,
            (low >> 32) as u32,
            high as u32,
            (high >> 32) as u32,
        ])
    }

    /// 16-byte tag over `message`
    pub fn tag(&self, message: &[u8]) -> [u8; 16] {
        let mut v = self.key;

        let full_blocks = if message.is_empty() {
            0
        } else {
            (message.len() - 1) / 16
        };
        for block in message.chunks_exact(16).take(full_blocks) {
            xor_words(&mut v, &block_words(block));
            permute(&mut v);
        }

        let rest = &message[full_blocks * 16..];
        let (last, subkey) = if !message.is_empty() && rest.len() == 16 {
            (block_words(rest), &self.k1)
        } else {
            let mut padded = [0u8; 16];
            padded[..rest.len()].copy_from_slice(rest);
            padded[rest.len()] = 0x01;
            (block_words(&padded), &self.k2)
        };

        xor_words(&mut v, &last);
        xor_words(&mut v, subkey);
        permute(&mut v);
        xor_words(&mut v, subkey);

        let mut tag = [0u8; 16];
        for (chunk, word) in tag.chunks_exact_mut(4).zip(v) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        tag
    }
}
