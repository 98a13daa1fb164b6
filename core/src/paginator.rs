/// Consecutive pages over a slice; the last page may be short.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    pages: Vec<&'a [T]>,
}

impl<'a, T> Paginator<'a, T> {
    /// A page size of zero is treated as one.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        Self { pages: items.chunks(page_size.max(1)).collect() }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, &'a [T]> {
        self.pages.iter()
    }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = &'a [T];
    type IntoIter = std::vec::IntoIter<&'a [T]>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_pages() {
        let items = [1, 2, 3, 4, 5];
        let pages: Vec<&[i32]> = paginate(&items, 2).into_iter().collect();
        assert_eq!(pages, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
    }

    #[test]
    fn exact_and_empty_inputs() {
        assert_eq!(paginate(&[1, 2, 3, 4], 2).len(), 2);
        assert!(paginate::<i32>(&[], 3).is_empty());
        assert_eq!(paginate(&[1, 2], 0).len(), 2);
    }
}
