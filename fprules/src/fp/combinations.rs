/// Calls `callback` with every `k`-combination of `0..n`, as ascending index
/// slices in lexicographic order.
pub fn for_each_combination<F>(n: usize, k: usize, callback: &mut F)
where
    F: FnMut(&[usize]),
{
    if k == 0 || k > n {
        return;
    }
    let mut current = Vec::with_capacity(k);
    combinations_recursive(n, k, 0, &mut current, callback);
}

fn combinations_recursive<F>(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    callback: &mut F,
) where
    F: FnMut(&[usize]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    // Leave room for the remaining picks.
    let last_start = n - (k - current.len());
    for i in start..=last_start {
        current.push(i);
        combinations_recursive(n, k, i + 1, current, callback);
        current.pop();
    }
}

/// Every nonempty proper subset of `0..n`, smaller subsets first.
pub fn proper_subsets(n: usize) -> Vec<Vec<usize>> {
    let mut subsets = Vec::new();
    for k in 1..n {
        for_each_combination(n, k, &mut |chosen: &[usize]| subsets.push(chosen.to_vec()));
    }
    subsets
}
