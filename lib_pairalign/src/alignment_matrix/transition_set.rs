use std::{fmt::Debug, marker::PhantomData};

use crate::score::Score;

/// A transition of the alignment automaton that can be stored in a [`TransitionSet`].
pub trait Transition: Copy + Eq + Debug + 'static {
    /// All transitions of this type, in traceback order.
    const ALL: &'static [Self];

    /// The position of this transition in [`Self::ALL`].
    fn index(self) -> usize;
}

/// The set of transitions that produced the optimal score of a cell.
///
/// An empty set marks a cell where traceback ends.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionSet<T> {
    members: u8,
    phantom_data: PhantomData<T>,
}

impl<T: Transition> TransitionSet<T> {
    pub fn new() -> Self {
        debug_assert!(T::ALL.len() <= 8);

        Self {
            members: 0,
            phantom_data: PhantomData,
        }
    }

    /// Selects the maximum score among the candidates and all transitions that attain it.
    ///
    /// Panics if there are no candidates.
    pub fn best(candidates: impl IntoIterator<Item = (T, Score)>) -> (Score, Self) {
        let mut best_score = None;
        let mut transitions = Self::new();

        for (transition, score) in candidates {
            match best_score {
                Some(best) if score < best => {}
                Some(best) if score == best => transitions.insert(transition),
                _ => {
                    best_score = Some(score);
                    transitions = Self::new();
                    transitions.insert(transition);
                }
            }
        }

        (
            best_score.expect("at least one candidate transition"),
            transitions,
        )
    }

    pub fn insert(&mut self, transition: T) {
        self.members |= 1 << transition.index();
    }

    pub fn contains(&self, transition: T) -> bool {
        self.members & (1 << transition.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.members == 0
    }

    pub fn len(&self) -> usize {
        self.members.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = T> {
        T::ALL
            .iter()
            .copied()
            .filter(move |transition| self.contains(*transition))
    }
}

impl<T: Transition> Default for TransitionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transition> FromIterator<T> for TransitionSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Self::new();
        for transition in iter {
            result.insert(transition);
        }
        result
    }
}

impl<T: Transition, const N: usize> From<[T; N]> for TransitionSet<T> {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Transition> Debug for TransitionSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{alignment_matrix::Direction, score::Score};

    use super::TransitionSet;

    #[test]
    fn best_keeps_ties() {
        let (score, transitions) = TransitionSet::best([
            (Direction::Diagonal, Score::new(4)),
            (Direction::Left, Score::new(-2)),
            (Direction::Top, Score::new(4)),
        ]);
        assert_eq!(score, Score::new(4));
        assert_eq!(transitions, [Direction::Diagonal, Direction::Top].into());
        assert_eq!(transitions.len(), 2);
        assert_eq!(
            transitions.iter().collect::<Vec<_>>(),
            vec![Direction::Diagonal, Direction::Top]
        );
    }

    #[test]
    fn best_tie_order_is_irrelevant() {
        for candidates in [
            [(Direction::Diagonal, 1), (Direction::Left, 1), (Direction::Top, 0)],
            [(Direction::Top, 0), (Direction::Left, 1), (Direction::Diagonal, 1)],
            [(Direction::Left, 1), (Direction::Top, 0), (Direction::Diagonal, 1)],
        ] {
            let (score, transitions) = TransitionSet::best(
                candidates
                    .into_iter()
                    .map(|(direction, score)| (direction, Score::new(score))),
            );
            assert_eq!(score, Score::new(1));
            assert_eq!(transitions, [Direction::Diagonal, Direction::Left].into());
        }
    }

    #[test]
    fn empty() {
        let transitions = TransitionSet::<Direction>::new();
        assert!(transitions.is_empty());
        assert!(!transitions.contains(Direction::Left));
        assert_eq!(format!("{transitions:?}"), "{}");
    }
}
