/*
  Tenor, a UCI-compatible chess engine.
  Copyright (C) 2026 The Tenor Authors.

  Tenor is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Tenor is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! A one-shot utility that searches for magic numbers and prints them as
//! Rust source. The engine ships its magics as constants in
//! `base::attacks`; run this only to regenerate them.
//!
//! The search samples sparse candidates (the AND of three random draws) and
//! keeps the first one that maps every blocker subset to a distinct index,
//! or to an index already holding the identical attack set. Candidates whose
//! product with the mask leaves fewer than 6 bits in the top byte are
//! rejected immediately; they cannot spread the relevant bits far enough.

use tenor::base::{
    attacks::{
        bishop_attacks_slow, index_to_occupancy, magic_index, rook_attacks_slow, BISHOP_BITS,
        BISHOP_MASKS, ROOK_BITS, ROOK_MASKS,
    },
    Bitboard, Square,
};

/// Search until a working magic for this square is found.
fn find_magic(sq: Square, is_bishop: bool, rng: &fastrand::Rng) -> u64 {
    let i = sq.index();
    let (mask, bits) = match is_bishop {
        true => (BISHOP_MASKS[i], BISHOP_BITS[i]),
        false => (ROOK_MASKS[i], ROOK_BITS[i]),
    };
    let subsets = 1usize << mask.len();

    // precompute every blocker arrangement and its true attack set
    let mut occupancies = Vec::with_capacity(subsets);
    let mut attacks = Vec::with_capacity(subsets);
    for subset in 0..subsets {
        let occ = index_to_occupancy(subset, mask);
        occupancies.push(occ);
        attacks.push(match is_bishop {
            true => bishop_attacks_slow(sq, occ),
            false => rook_attacks_slow(sq, occ),
        });
    }

    loop {
        let candidate = rng.u64(..) & rng.u64(..) & rng.u64(..);
        if (mask.as_u64().wrapping_mul(candidate) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        let mut table: Vec<Option<Bitboard>> = vec![None; 1 << bits];
        let mut works = true;
        for subset in 0..subsets {
            let key = magic_index(occupancies[subset], candidate, bits);
            match table[key] {
                None => table[key] = Some(attacks[subset]),
                // collisions are fine when both subsets see the same attacks
                Some(prev) if prev == attacks[subset] => (),
                Some(_) => {
                    works = false;
                    break;
                }
            }
        }
        if works {
            return candidate;
        }
    }
}

fn print_table(name: &str, is_bishop: bool, rng: &fastrand::Rng) {
    println!("pub const {name}: [u64; 64] = [");
    for sq in Square::ALL {
        let magic = find_magic(sq, is_bishop, rng);
        println!("    {magic:#018x}, // {sq}");
    }
    println!("];");
}

fn main() {
    let rng = fastrand::Rng::new();
    print_table("ROOK_MAGICS", false, &rng);
    println!();
    print_table("BISHOP_MAGICS", true, &rng);
}
