/// 複数サンプルを代表値1つに集約する
///
/// 昇順に並べ替えた `len / 2` 番目の値（偶数個なら上側の中央値）を返す。
/// 反射ノイズによる外れ値は両端に寄るため結果に影響しない。
/// 空の場合は `None`。
///
/// # Examples
/// ```
/// use sonar_core::sampling::median;
///
/// assert_eq!(median(&[3.0, 100.0, 1.0]), Some(3.0));
/// ```
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[sorted.len() / 2])
}
