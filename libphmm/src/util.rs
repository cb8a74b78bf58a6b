#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

pub trait LogAbuse {
    fn ln_or_inf(self) -> f64;
}

impl LogAbuse for f64 {
    fn ln_or_inf(self) -> f64 {
        if self == 0.0 {
            -f64::INFINITY
        } else {
            self.ln()
        }
    }
}

pub trait VecMath {
    fn sum(&self) -> f64;
    fn avg(&self) -> Option<f64>;
    fn ordered_avg(&self) -> Option<f64>;
    fn argmax(&self) -> Option<usize>;
    fn normalize(&mut self);
}

impl VecMath for Vec<f64> {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn avg(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        Some(self.sum() / self.len() as f64)
    }

    /// The mean of the values summed in ascending order, which
    /// makes the result independent of the order of the vector.
    fn ordered_avg(&self) -> Option<f64> {
        let mut sorted = self.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.avg()
    }

    fn argmax(&self) -> Option<usize> {
        let mut max = *self.first()?;
        let mut argmax: usize = 0;

        for (idx, &item) in self.iter().enumerate().skip(1) {
            if item > max {
                max = item;
                argmax = idx;
            }
        }

        Some(argmax)
    }

    /// Scales the values to sum to 1. A vector
    /// with no mass becomes the uniform distribution.
    fn normalize(&mut self) {
        let sum = self.sum();

        if sum > 0.0 {
            self.iter_mut().for_each(|item| *item /= sum);
        } else {
            let uniform = 1.0 / self.len() as f64;
            self.iter_mut().for_each(|item| *item = uniform);
        }
    }
}

#[macro_export]
macro_rules! assert_eq_pairs {
    ($( $left:expr, $right:expr );+ $(;)?) => {
        $(
            assert!($left == $right);
        )+
    };
}
