#![allow(missing_docs)]

use ndarray::{Array1, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

use roboevo::simulation::brain::activation::{self, ActivationKind};
use roboevo::simulation::brain::{GenomeCodec, GenomeRanges, Network, NetworkParams, ParamRange};
use roboevo::simulation::error::SimError;

fn create_test_network() -> Network {
    Network::new(&[2, 3, 1], activation::tanh).unwrap()
}

#[test]
fn test_parameter_count() {
    let network = create_test_network();
    assert_eq!(network.num_links(), 2 * 3 + 3 * 1);
    assert_eq!(network.num_biased_nodes(), 4);
    assert_eq!(network.parameter_count(), 17);
    assert_eq!(network.layer_sizes(), vec![2, 3, 1]);
    assert_eq!(network.input_size(), 2);
    assert_eq!(network.output_size(), 1);
}

#[test]
fn test_invalid_layer_configurations() {
    assert!(Network::new(&[], activation::tanh).is_err());
    assert!(Network::new(&[4], activation::tanh).is_err());
    assert!(Network::new(&[2, 0, 1], activation::tanh).is_err());
}

#[test]
fn test_links_connect_adjacent_layers_only() {
    let network = create_test_network();
    for link in network.links() {
        assert_eq!(link.to.layer, link.from.layer + 1);
    }
    // Upstream node major, downstream node minor.
    let first: Vec<(usize, usize)> = network.links()[..3]
        .iter()
        .map(|link| (link.from.index, link.to.index))
        .collect();
    assert_eq!(first, vec![(0, 0), (0, 1), (0, 2)]);
}

#[test]
fn test_weights_mut_leaves_topology_intact() {
    let mut network = create_test_network();
    let before: Vec<_> = network.links().iter().map(|link| (link.from, link.to)).collect();

    for (i, weight) in network.weights_mut().enumerate() {
        *weight = i as f32;
    }

    assert_eq!(network.weights_mut().count(), network.num_links());
    for (i, link) in network.links().iter().enumerate() {
        assert_eq!((link.from, link.to), before[i]);
        assert!((link.weight - i as f32).abs() < 1e-6);
    }
    assert_eq!(network.think(&array![1.0, 1.0]).unwrap().len(), 1);
}

#[test]
fn test_wrong_input_width_is_rejected() {
    let mut network = create_test_network();
    match network.think(&array![1.0, 2.0, 3.0]) {
        Err(SimError::InputSize { expected, actual }) => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("expected InputSize error, got {other:?}"),
    }
}

#[test]
fn test_manual_linear_network() {
    let mut network = Network::new(&[2, 1], activation::linear).unwrap();
    for (weight, value) in network.weights_mut().zip([0.5, -1.0]) {
        *weight = value;
    }
    for node in network.biased_nodes_mut() {
        node.bias = 0.25;
        node.n = 0.5;
    }

    // 0.5 * (0.5·1 - 1·3 + 0.25) = -1.125
    let output = network.think(&array![1.0, 3.0]).unwrap();
    assert_eq!(output.len(), 1);
    assert!((output[0] + 1.125).abs() < 1e-6);

    // Input nodes pass their values through untouched.
    assert_eq!(network.layers()[0].nodes[1].output, 3.0);
}

#[test]
fn test_hidden_layer_feeds_forward() {
    let mut network = Network::new(&[1, 2, 1], activation::linear).unwrap();
    // Links: in->h0, in->h1, h0->out, h1->out.
    let weights = [2.0, -1.0, 1.0, 3.0];
    for (weight, value) in network.weights_mut().zip(weights) {
        *weight = value;
    }

    // h0 = 2, h1 = -1, out = 2 - 3 = -1
    let output = network.think(&array![1.0]).unwrap();
    assert!((output[0] + 1.0).abs() < 1e-6);
}

#[test]
fn test_activation_is_injected() {
    let mut network = Network::new(&[1, 1], activation::linear).unwrap();
    for weight in network.weights_mut() {
        *weight = 1.0;
    }
    assert!((network.think(&array![0.0]).unwrap()[0]).abs() < 1e-6);

    network.set_activation(activation::sigmoid);
    assert!((network.think(&array![0.0]).unwrap()[0] - 0.5).abs() < 1e-6);
}

#[test]
fn test_forward_pass_is_deterministic() {
    let codec = GenomeCodec::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut network = create_test_network();
    let genome = GenomeCodec::create_random_genome(&network, &mut rng);
    codec.decode(&mut network, &genome).unwrap();

    let inputs = array![0.3, -0.8];
    let first = network.think(&inputs).unwrap();
    let second = network.think(&inputs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_activation_functions() {
    assert!((activation::sigmoid(0.0, 3.0) - 0.5).abs() < 1e-6);
    assert!((activation::tanh(1.0, 0.0)).abs() < 1e-6);
    assert!((activation::gaussian(0.0, 2.0) - 1.0).abs() < 1e-6);
    assert!((activation::linear(2.0, 1.5) - 3.0).abs() < 1e-6);
    assert!((activation::leaky_relu(2.0, 0.1) - 2.0).abs() < 1e-6);
    assert!((activation::leaky_relu(-2.0, 0.1) + 0.2).abs() < 1e-6);
    assert!((activation::sine(0.0, 5.0)).abs() < 1e-6);
    assert!((ActivationKind::Tanh.function()(0.5, 2.0) - 1.0_f32.tanh()).abs() < 1e-6);
}

#[test]
fn test_network_from_params() {
    let params: NetworkParams =
        serde_json::from_str(r#"{ "layers": [3, 4, 2], "activation": { "func": "sine" } }"#)
            .unwrap();
    assert_eq!(params.activation.func, ActivationKind::Sine);
    let network = Network::from_params(&params).unwrap();
    assert_eq!(network.parameter_count(), 3 * 4 + 4 * 2 + 2 * 6);
}

#[test]
fn test_codec_round_trip() {
    let codec = GenomeCodec::default();
    let mut rng = StdRng::seed_from_u64(11);

    for sizes in [vec![1, 1], vec![2, 3], vec![2, 3, 1], vec![4, 5, 3, 2]] {
        let mut network = Network::new(&sizes, activation::tanh).unwrap();

        // Genome to network to genome.
        let genome = GenomeCodec::create_random_genome(&network, &mut rng);
        assert_eq!(genome.len(), network.parameter_count(), "{sizes:?}");
        assert!(genome.iter().all(|gene| (0.0..1.0).contains(gene)));

        codec.decode(&mut network, &genome).unwrap();
        let encoded = codec.encode(&network);
        assert_eq!(encoded.len(), genome.len());
        for (a, b) in encoded.iter().zip(genome.iter()) {
            assert!((a - b).abs() < 1e-5, "{sizes:?}: {a} != {b}");
        }

        // Network to genome to network.
        let mut copy = Network::new(&sizes, activation::tanh).unwrap();
        codec.decode(&mut copy, &codec.encode(&network)).unwrap();
        for (a, b) in copy.links().iter().zip(network.links()) {
            assert!((a.weight - b.weight).abs() < 1e-4, "{sizes:?}");
        }
        for (a, b) in copy.biased_nodes().zip(network.biased_nodes()) {
            assert!((a.bias - b.bias).abs() < 1e-4, "{sizes:?}");
            assert!((a.n - b.n).abs() < 1e-4, "{sizes:?}");
        }
    }
}

#[test]
fn test_gene_order() {
    let ranges = GenomeRanges::default();
    let codec = GenomeCodec::new(ranges).unwrap();
    let mut network = Network::new(&[1, 2], activation::tanh).unwrap();

    for (weight, value) in network.weights_mut().zip([ranges.weight.min, ranges.weight.max]) {
        *weight = value;
    }
    for (node, (bias, n)) in network.biased_nodes_mut().zip([
        (ranges.bias.min, ranges.shape.min),
        (ranges.bias.max, ranges.shape.max),
    ]) {
        node.bias = bias;
        node.n = n;
    }

    // Weights, then biases, then shapes.
    let genome = codec.encode(&network);
    let expected = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    for (gene, want) in genome.iter().zip(expected) {
        assert!((gene - want).abs() < 1e-6, "{genome:?}");
    }
}

#[test]
fn test_decode_rejects_wrong_length() {
    let codec = GenomeCodec::default();
    let mut network = create_test_network();
    let before = codec.encode(&network);

    match codec.decode(&mut network, &Array1::from_elem(16, 1.0)) {
        Err(SimError::GenomeLength { expected, actual }) => {
            assert_eq!(expected, 17);
            assert_eq!(actual, 16);
        }
        other => panic!("expected GenomeLength error, got {other:?}"),
    }
    assert_eq!(codec.encode(&network), before);
}

#[test]
fn test_invalid_ranges_are_rejected() {
    let inverted = GenomeRanges {
        weight: ParamRange::new(1.0, -1.0),
        ..GenomeRanges::default()
    };
    assert!(GenomeCodec::new(inverted).is_err());

    let infinite = GenomeRanges {
        bias: ParamRange::new(f32::NEG_INFINITY, 0.0),
        ..GenomeRanges::default()
    };
    assert!(GenomeCodec::new(infinite).is_err());

    let empty = GenomeRanges {
        shape: ParamRange::new(2.0, 2.0),
        ..GenomeRanges::default()
    };
    assert!(GenomeCodec::new(empty).is_err());
}
