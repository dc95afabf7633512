/// Deterministic seatings of `players` agents, in lexicographic-swap order.
/// Entry `perm[seat]` is the index of the agent sitting at `seat`.
pub struct SeatPermutations {
    permutations: Vec<Vec<usize>>,
}

impl SeatPermutations {
    pub fn new(players: usize, count: usize) -> Self {
        let limit = count.min(Self::max_for(players));
        let mut permutations = Vec::with_capacity(limit);
        let mut base: Vec<usize> = (0..players).collect();
        generate(&mut base, 0, limit, &mut permutations);
        Self { permutations }
    }

    /// Number of distinct seatings, `players!`.
    pub fn max_for(players: usize) -> usize {
        (1..=players).product()
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.permutations
    }
}

fn generate(data: &mut [usize], start: usize, limit: usize, output: &mut Vec<Vec<usize>>) {
    if output.len() >= limit {
        return;
    }

    if start + 1 >= data.len() {
        output.push(data.to_vec());
        return;
    }

    for idx in start..data.len() {
        data.swap(start, idx);
        generate(data, start + 1, limit, output);
        data.swap(start, idx);
        if output.len() >= limit {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_comes_first() {
        let perms = SeatPermutations::new(3, 1);
        assert_eq!(perms.as_slice(), &[vec![0, 1, 2]]);
    }

    #[test]
    fn caps_at_factorial() {
        assert_eq!(SeatPermutations::new(2, 10).as_slice().len(), 2);
        assert_eq!(SeatPermutations::new(3, 10).as_slice().len(), 6);
        assert_eq!(SeatPermutations::new(4, 100).as_slice().len(), 24);
    }

    #[test]
    fn seatings_are_unique() {
        let perms = SeatPermutations::new(4, 24);
        let mut seen = perms.as_slice().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);
    }
}
