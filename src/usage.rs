use crate::stats::CoreCounters;

/// 根据前后两代计数计算单核使用率（0-100，向下取整）。
///
/// 上一代全零（首次采样）、总时间未增长或 idle 倒退时返回 0，计数回绕等异常视为无活动。
pub fn compute_usage(prev: &CoreCounters, curr: &CoreCounters) -> u8 {
    if prev.is_zero() {
        return 0;
    }

    let (prev_total, curr_total) = (prev.total(), curr.total());
    if curr_total <= prev_total || curr.idle < prev.idle {
        return 0;
    }

    let total_diff = curr_total - prev_total;
    let idle_diff = (curr.idle - prev.idle) as u128;
    let busy_diff = total_diff.saturating_sub(idle_diff);

    (100 * busy_diff / total_diff).min(100) as u8
}

/// 逐核计算使用率，结果与 `curr` 一一对应；`prev` 中缺失的序号按全零处理
pub fn compute_all(prev: &[CoreCounters], curr: &[CoreCounters]) -> Vec<u8> {
    curr.iter()
        .enumerate()
        .map(|(i, c)| match prev.get(i) {
            Some(p) => compute_usage(p, c),
            None => compute_usage(&CoreCounters::default(), c),
        })
        .collect()
}
