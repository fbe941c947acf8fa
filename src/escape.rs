// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration at the heart of the Mandelbrot set.

use num::Complex;

/// The squared magnitude past which an orbit is considered to have
/// escaped.  Larger than the textbook 4.0 so that the logarithms in
/// the smoothing formula are well behaved.
pub const ESCAPE_RADIUS_SQUARED: f64 = 64.0;

/// How an orbit behaved.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// True if the orbit never left the escape radius within the
    /// iteration budget.
    pub in_set: bool,
    /// The number of iterates that stayed inside the escape radius.
    /// Equal to the budget for points in the set.
    pub iterations: u32,
    /// Continuous refinement of `iterations`; never negative.
    /// Meaningless (zero) for points in the set.
    pub smooth: f64,
}

/// Iterate z = z^2 + c from z = 0 until the orbit leaves the escape
/// radius or `max_iteration` iterates have stayed inside it.
///
/// The smoothing uses the magnitude of the first iterate outside the
/// radius: <https://en.wikipedia.org/wiki/Plotting_algorithms_for_the_Mandelbrot_set#Continuous_(smooth)_coloring>
pub fn evaluate(c: Complex<f64>, max_iteration: u32) -> Escape {
    let (mut re, mut im) = (0.0_f64, 0.0_f64);
    let mut iterations = 0;
    let mut escaped = false;
    while iterations < max_iteration {
        let re_squared = re * re;
        let im_squared = im * im;
        im = 2.0 * re * im + c.im;
        re = re_squared - im_squared + c.re;
        if re * re + im * im > ESCAPE_RADIUS_SQUARED {
            escaped = true;
            break;
        }
        iterations += 1;
    }

    if !escaped {
        return Escape {
            in_set: true,
            iterations,
            smooth: 0.0,
        };
    }

    let log_zn = (re * re + im * im).ln() / 2.0;
    let nu = (log_zn / std::f64::consts::LN_2).ln() / std::f64::consts::LN_2;
    Escape {
        in_set: false,
        iterations,
        smooth: (f64::from(iterations) + 1.0 - nu).max(0.0),
    }
}
