use crate::Series;

/// # Summary
/// 能量潮 OBV。
///
/// # Logic
/// 1. 首值为第一根 K 线的成交量。
/// 2. 收盘价上涨累加成交量，下跌扣减，持平不变。
pub fn obv(closes: &[f64], volumes: &[f64]) -> Series {
    let mut total = 0.0;
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| {
            if i == 0 {
                total = v;
            } else if c > closes[i - 1] {
                total += v;
            } else if c < closes[i - 1] {
                total -= v;
            }
            Some(total)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obv_accumulates() {
        let out = obv(&[10.0, 11.0, 11.0, 9.0], &[100.0, 50.0, 30.0, 20.0]);
        assert_eq!(out, vec![Some(100.0), Some(150.0), Some(150.0), Some(130.0)]);
    }
}
