use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{NetError, Result};
use crate::math::io_vector::IOVector;
use crate::neuron::neuron::{Neuron, NeuronKind};

/// Shared ownership handle for a layer. Callers own layers through this
/// alias; a child layer only keeps a `Weak` back-reference to its parent,
/// so parents must be kept alive at least as long as their children.
pub type LayerHandle = Rc<RefCell<Layer>>;

/// An ordered collection of same-kind neurons, optionally wired to a
/// single parent layer from which every neuron draws its inputs.
///
/// Evaluation recomputes the full parent chain on every call; nothing is
/// cached. Not safe for concurrent mutation (the handle type is
/// `Rc<RefCell<_>>`, which is neither `Send` nor `Sync`).
#[derive(Debug)]
pub struct Layer {
    neurons: Vec<Neuron>,
    parent: Option<Weak<RefCell<Layer>>>,
    default_weight: f64,
    default_bias: f64,
    default_threshold: f64,
    is_input_layer: bool,
}

impl Layer {
    /// Allocates `len` zero-valued neurons of the requested kind, with no
    /// inputs wired. The defaults are applied later, at wiring time.
    pub fn new(
        len: usize,
        kind: NeuronKind,
        default_weight: f64,
        default_bias: f64,
        default_threshold: f64,
    ) -> Layer {
        Layer {
            neurons: (0..len).map(|_| Neuron::new(kind)).collect(),
            parent: None,
            default_weight,
            default_bias,
            default_threshold,
            is_input_layer: false,
        }
    }

    /// `new` wrapped in a `LayerHandle`, ready for wiring.
    pub fn shared(
        len: usize,
        kind: NeuronKind,
        default_weight: f64,
        default_bias: f64,
        default_threshold: f64,
    ) -> LayerHandle {
        Rc::new(RefCell::new(Layer::new(
            len,
            kind,
            default_weight,
            default_bias,
            default_threshold,
        )))
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn is_input_layer(&self) -> bool {
        self.is_input_layer
    }

    pub fn neuron(&self, index: usize) -> Result<&Neuron> {
        self.neurons.get(index).ok_or(NetError::IndexOutOfRange {
            index,
            len: self.neurons.len(),
        })
    }

    /// Flags this layer as the network's input layer. Any previously wired
    /// parent is deliberately left in place; only the flag changes.
    pub fn mark_as_input_layer(&mut self) {
        self.is_input_layer = true;
    }

    /// Wires every neuron to draw its inputs from `parent`: clears the
    /// input flag, stores a non-owning link, and hands each neuron its own
    /// copy of a default-weight vector of length `parent.len()` together
    /// with the layer's default bias and threshold.
    pub fn set_parent_layer(&mut self, parent: &LayerHandle) -> Result<()> {
        self.is_input_layer = false;
        let parent_len = parent.borrow().len();
        self.parent = Some(Rc::downgrade(parent));

        let weights = vec![self.default_weight; parent_len];
        for neuron in &mut self.neurons {
            neuron.set_inputs(
                parent_len,
                self.default_bias,
                weights.clone(),
                self.default_threshold,
            )?;
        }
        Ok(())
    }

    /// Re-initializes every neuron with standard-normal parameters drawn
    /// from a generator seeded with `seed`. Per neuron, in index order, the
    /// draws are consumed as [bias, weight_0, .., weight_{n-1}]; the
    /// threshold stays at the layer default. Same seed, same shape ⇒
    /// identical parameters.
    pub fn randomize_gaussian(&mut self, seed: u64) -> Result<()> {
        let parent = self.parent.as_ref().ok_or(NetError::NoParentWired)?;
        let parent_len = parent
            .upgrade()
            .ok_or(NetError::ParentLayerDropped)?
            .borrow()
            .len();

        let mut rng = StdRng::seed_from_u64(seed);
        for neuron in &mut self.neurons {
            let bias: f64 = StandardNormal.sample(&mut rng);
            let weights: Vec<f64> = (0..parent_len)
                .map(|_| StandardNormal.sample(&mut rng))
                .collect();
            neuron.update_info(bias, weights, self.default_threshold)?;
        }
        Ok(())
    }

    /// Overwrites one scalar of one neuron. `slot` selects the target:
    /// slots 0 and 1 BOTH overwrite the threshold (kept as-is; unifying
    /// the mapping with `tweak_neuron_delta` is a pending design
    /// decision), slot `2 + k` overwrites weight `k`.
    pub fn tweak_neuron(&mut self, index: usize, new_value: f64, slot: usize) -> Result<()> {
        let len = self.neurons.len();
        let neuron = self
            .neurons
            .get_mut(index)
            .ok_or(NetError::IndexOutOfRange { index, len })?;
        let bias = neuron.bias();
        let threshold = neuron.threshold();
        let mut weights = neuron.weights().to_vec();

        match slot {
            0 | 1 => neuron.update_info(bias, weights, new_value),
            slot => {
                let wi = slot - 2;
                if wi >= weights.len() {
                    return Err(NetError::IndexOutOfRange {
                        index: wi,
                        len: weights.len(),
                    });
                }
                weights[wi] = new_value;
                neuron.update_info(bias, weights, threshold)
            }
        }
    }

    /// Adds `delta` to one scalar of one neuron. Slot mapping: 0 adds to
    /// the bias, 1 adds to the threshold (NOT the same mapping as
    /// `tweak_neuron`, where slot 0 also hits the threshold), slot `2 + k`
    /// adds to weight `k`.
    pub fn tweak_neuron_delta(&mut self, index: usize, delta: f64, slot: usize) -> Result<()> {
        let len = self.neurons.len();
        let neuron = self
            .neurons
            .get_mut(index)
            .ok_or(NetError::IndexOutOfRange { index, len })?;
        let bias = neuron.bias();
        let threshold = neuron.threshold();
        let mut weights = neuron.weights().to_vec();

        match slot {
            0 => neuron.update_info(bias + delta, weights, threshold),
            1 => neuron.update_info(bias, weights, threshold + delta),
            slot => {
                let wi = slot - 2;
                if wi >= weights.len() {
                    return Err(NetError::IndexOutOfRange {
                        index: wi,
                        len: weights.len(),
                    });
                }
                weights[wi] += delta;
                neuron.update_info(bias, weights, threshold)
            }
        }
    }

    /// Copies each element of `v` into the corresponding input neuron.
    /// Silent no-op unless this layer is flagged as the input layer.
    pub fn set_input(&mut self, v: &IOVector) -> Result<()> {
        if !self.is_input_layer {
            return Ok(());
        }
        if v.len() != self.neurons.len() {
            return Err(NetError::ShapeMismatch {
                expected: self.neurons.len(),
                actual: v.len(),
            });
        }
        for (neuron, value) in self.neurons.iter_mut().zip(v.as_slice()) {
            neuron.set_value(*value);
        }
        Ok(())
    }

    /// Single-neuron variant of `set_input`; same silent no-op on a
    /// non-input layer.
    pub fn set_neuron_input(&mut self, index: usize, value: f64) -> Result<()> {
        if !self.is_input_layer {
            return Ok(());
        }
        let len = self.neurons.len();
        let neuron = self
            .neurons
            .get_mut(index)
            .ok_or(NetError::IndexOutOfRange { index, len })?;
        neuron.set_value(value);
        Ok(())
    }

    /// Every neuron's current output, in neuron order. Recomputes the
    /// whole parent chain on each call.
    pub fn get_output(&self) -> Result<IOVector> {
        let inputs = self.parent_output()?;
        let mut out = Vec::with_capacity(self.neurons.len());
        for neuron in &self.neurons {
            out.push(neuron.output(&inputs)?);
        }
        Ok(IOVector::new(out))
    }

    pub fn get_neuron_output(&self, index: usize) -> Result<f64> {
        let neuron = self.neuron(index)?;
        let inputs = self.parent_output()?;
        neuron.output(&inputs)
    }

    /// Resolves the parent chain. Unwired layers evaluate against an
    /// empty input vector.
    fn parent_output(&self) -> Result<Vec<f64>> {
        match &self.parent {
            None => Ok(Vec::new()),
            Some(weak) => {
                let parent = weak.upgrade().ok_or(NetError::ParentLayerDropped)?;
                let out = parent.borrow().get_output()?;
                Ok(out.into_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wired_pair(input_len: usize, kind: NeuronKind) -> (LayerHandle, Layer) {
        let input = Layer::shared(input_len, NeuronKind::Input, 1.0, 0.0, 1.0);
        input.borrow_mut().mark_as_input_layer();
        let mut hidden = Layer::new(2, kind, 1.0, 0.0, 1.0);
        hidden.set_parent_layer(&input).unwrap();
        (input, hidden)
    }

    #[test]
    fn construction_builds_unwired_neurons_of_the_requested_kind() {
        let layer = Layer::new(3, NeuronKind::Sigmoid, 0.5, 0.1, 0.2);
        assert_eq!(layer.len(), 3);
        assert!(!layer.is_input_layer());
        for i in 0..3 {
            let n = layer.neuron(i).unwrap();
            assert_eq!(n.kind(), NeuronKind::Sigmoid);
            assert!(n.weights().is_empty());
        }
    }

    #[test]
    fn set_parent_layer_applies_layer_defaults_to_every_neuron() {
        let input = Layer::shared(3, NeuronKind::Input, 1.0, 0.0, 1.0);
        let mut hidden = Layer::new(2, NeuronKind::Threshold, 0.25, 0.5, 0.75);
        hidden.mark_as_input_layer();
        hidden.set_parent_layer(&input).unwrap();

        assert!(!hidden.is_input_layer());
        for i in 0..2 {
            let n = hidden.neuron(i).unwrap();
            assert_eq!(n.weights(), &[0.25, 0.25, 0.25]);
            assert_eq!(n.bias(), 0.5);
            assert_eq!(n.threshold(), 0.75);
        }
    }

    #[test]
    fn each_neuron_owns_an_independent_weight_vector() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);
        hidden.tweak_neuron(0, 9.0, 2).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().weights(), &[9.0, 1.0]);
        assert_eq!(hidden.neuron(1).unwrap().weights(), &[1.0, 1.0]);
    }

    #[test]
    fn randomize_gaussian_is_reproducible_per_seed() {
        let (_ia, mut a) = wired_pair(3, NeuronKind::Sigmoid);
        let (_ib, mut b) = wired_pair(3, NeuronKind::Sigmoid);
        a.randomize_gaussian(42).unwrap();
        b.randomize_gaussian(42).unwrap();

        for i in 0..a.len() {
            let (na, nb) = (a.neuron(i).unwrap(), b.neuron(i).unwrap());
            assert_eq!(na.bias(), nb.bias());
            assert_eq!(na.weights(), nb.weights());
        }
    }

    #[test]
    fn randomize_gaussian_with_different_seeds_diverges() {
        let (_ia, mut a) = wired_pair(3, NeuronKind::Sigmoid);
        let (_ib, mut b) = wired_pair(3, NeuronKind::Sigmoid);
        a.randomize_gaussian(1).unwrap();
        b.randomize_gaussian(2).unwrap();
        assert_ne!(a.neuron(0).unwrap().weights(), b.neuron(0).unwrap().weights());
    }

    #[test]
    fn randomize_gaussian_leaves_threshold_at_the_layer_default() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);
        hidden.randomize_gaussian(7).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().threshold(), 1.0);
        assert_eq!(hidden.neuron(1).unwrap().threshold(), 1.0);
    }

    #[test]
    fn randomize_gaussian_without_a_parent_fails() {
        let mut layer = Layer::new(2, NeuronKind::Sigmoid, 1.0, 0.0, 1.0);
        assert_eq!(layer.randomize_gaussian(42), Err(NetError::NoParentWired));
    }

    #[test]
    fn tweak_neuron_maps_slots_zero_and_one_to_the_threshold() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);

        hidden.tweak_neuron(0, 5.0, 0).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().threshold(), 5.0);
        assert_eq!(hidden.neuron(0).unwrap().bias(), 0.0);

        hidden.tweak_neuron(0, 6.0, 1).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().threshold(), 6.0);
        assert_eq!(hidden.neuron(0).unwrap().bias(), 0.0);
    }

    #[test]
    fn tweak_neuron_delta_maps_slot_zero_to_bias_and_one_to_threshold() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);

        hidden.tweak_neuron_delta(0, 0.5, 0).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().bias(), 0.5);
        assert_eq!(hidden.neuron(0).unwrap().threshold(), 1.0);

        hidden.tweak_neuron_delta(0, -0.25, 1).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().threshold(), 0.75);
        assert_eq!(hidden.neuron(0).unwrap().bias(), 0.5);
    }

    #[test]
    fn tweak_neuron_touches_only_the_targeted_weight() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);
        hidden.tweak_neuron(1, 0.125, 3).unwrap();

        let n = hidden.neuron(1).unwrap();
        assert_eq!(n.weights(), &[1.0, 0.125]);
        assert_eq!(n.bias(), 0.0);
        assert_eq!(n.threshold(), 1.0);
    }

    #[test]
    fn tweak_neuron_delta_adds_to_the_targeted_weight() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);
        hidden.tweak_neuron_delta(0, 0.5, 2).unwrap();
        assert_eq!(hidden.neuron(0).unwrap().weights(), &[1.5, 1.0]);
    }

    #[test]
    fn tweak_rejects_bad_neuron_and_weight_indices() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Threshold);
        assert_eq!(
            hidden.tweak_neuron(5, 1.0, 0),
            Err(NetError::IndexOutOfRange { index: 5, len: 2 })
        );
        // slot 4 -> weight index 2, but only 2 weights exist
        assert_eq!(
            hidden.tweak_neuron(0, 1.0, 4),
            Err(NetError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            hidden.tweak_neuron_delta(0, 1.0, 4),
            Err(NetError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn set_input_copies_values_into_input_neurons() {
        let input = Layer::shared(3, NeuronKind::Input, 1.0, 0.0, 1.0);
        input.borrow_mut().mark_as_input_layer();
        input
            .borrow_mut()
            .set_input(&IOVector::new(vec![1.0, 2.0, 3.0]))
            .unwrap();
        assert_eq!(
            input.borrow().get_output().unwrap(),
            IOVector::new(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn set_input_rejects_wrong_length() {
        let mut input = Layer::new(3, NeuronKind::Input, 1.0, 0.0, 1.0);
        input.mark_as_input_layer();
        assert_eq!(
            input.set_input(&IOVector::new(vec![1.0, 2.0])),
            Err(NetError::ShapeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn set_input_on_a_non_input_layer_is_a_silent_no_op() {
        let (_input, mut hidden) = wired_pair(2, NeuronKind::Sigmoid);
        hidden.set_input(&IOVector::new(vec![1.0, 1.0])).unwrap();
        hidden.set_neuron_input(0, 1.0).unwrap();
        // parameters and wiring untouched
        assert_eq!(hidden.neuron(0).unwrap().weights(), &[1.0, 1.0]);
    }

    #[test]
    fn set_neuron_input_updates_a_single_neuron() {
        let mut input = Layer::new(2, NeuronKind::Input, 1.0, 0.0, 1.0);
        input.mark_as_input_layer();
        input.set_neuron_input(1, 4.5).unwrap();
        assert_eq!(input.get_neuron_output(0).unwrap(), 0.0);
        assert_eq!(input.get_neuron_output(1).unwrap(), 4.5);
        assert_eq!(
            input.set_neuron_input(2, 1.0),
            Err(NetError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn get_output_fails_once_the_parent_is_dropped() {
        let input = Layer::shared(2, NeuronKind::Input, 1.0, 0.0, 1.0);
        input.borrow_mut().mark_as_input_layer();
        let mut hidden = Layer::new(1, NeuronKind::Sigmoid, 1.0, 0.0, 1.0);
        hidden.set_parent_layer(&input).unwrap();

        drop(input);
        assert_eq!(hidden.get_output(), Err(NetError::ParentLayerDropped));
    }
}
