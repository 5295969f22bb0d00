use experiments::{NormStats, PARAM_COUNT, TrainingSet};
use log::{debug, info};
use ml_core::{
    Sequential,
    activations::ActFn,
    layers::Layer,
    loss::Mse,
    optimization::Adam,
};
use ndarray::{Array2, s};
use rand::{Rng, seq::SliceRandom};

use crate::{
    config::TrainConfig,
    progress::{EpochProgress, LossHistory, TrainObserver},
};

/// What a finished fit hands back for publication.
pub(crate) struct FitOutcome {
    pub net: Sequential,
    pub epochs_run: usize,
    pub final_loss: f32,
    pub final_val_loss: f32,
}

/// Runs one full training run over a frozen snapshot of the set and its
/// statistics. The last `validation_len` samples in collection order form the
/// validation set; the training portion is reshuffled every epoch.
pub(crate) fn fit<O, R>(
    set: &TrainingSet,
    stats: &NormStats,
    config: &TrainConfig,
    history: &mut LossHistory,
    observer: &mut O,
    rng: &mut R,
) -> ml_core::Result<FitOutcome>
where
    O: TrainObserver + ?Sized,
    R: Rng,
{
    let n = set.len();
    let n_val = config.validation_len(n);
    let n_train = n - n_val;

    let (x, y) = normalized_arrays(set, stats);
    let mut net = build_network(config, rng)?;

    let mse = Mse::new();
    let mut adam = Adam::new(config.learning_rate);
    let mut indices: Vec<usize> = (0..n_train).collect();

    let mut xb = Array2::zeros((0, 0));
    let mut yb = Array2::zeros((0, 0));

    let mut best_val_loss = f32::INFINITY;
    let mut patience_counter = 0;

    let mut epochs_run = 0;
    let mut final_loss = 0.0;
    let mut final_val_loss = 0.0;

    for epoch in 1..=config.epochs {
        indices.shuffle(rng);

        let mut total_loss = 0.0;
        let mut num_batches = 0;
        for chunk in indices.chunks(config.batch_size) {
            xb = gather_rows(&x, chunk, xb);
            yb = gather_rows(&y, chunk, yb);

            total_loss += net.train_batch(xb.view(), yb.view(), &mse, &mut adam, rng)?;
            num_batches += 1;
        }

        // NOTE: averaging the per-batch losses approximates the epoch loss
        // without forwarding over the whole set again.
        let loss = total_loss / num_batches as f32;
        let val_loss = if n_val > 0 {
            net.evaluate(
                x.slice(s![n_train.., ..]),
                y.slice(s![n_train.., ..]),
                &mse,
            )?
        } else {
            loss
        };

        epochs_run = epoch;
        final_loss = loss;
        final_val_loss = val_loss;

        let progress = EpochProgress {
            epoch,
            epochs: config.epochs,
            loss,
            val_loss,
        };
        history.push(progress);

        // The observer call is the loop's cooperative yield point.
        observer.on_epoch(progress);

        if epoch % 10 == 0 {
            debug!("epoch {epoch}/{}: loss={loss:.6} val_loss={val_loss:.6}", config.epochs);
        }

        if let Some(es) = config.early_stopping {
            if val_loss < best_val_loss {
                best_val_loss = val_loss;
                patience_counter = 0;
            } else {
                patience_counter += 1;
            }

            if patience_counter >= es.patience && epoch > es.min_epochs {
                info!("early stopping at epoch {epoch}: best val_loss={best_val_loss:.6}");
                break;
            }
        }
    }

    Ok(FitOutcome {
        net,
        epochs_run,
        final_loss,
        final_val_loss,
    })
}

/// Builds the normalized input matrix and output column for the whole set,
/// in collection order.
fn normalized_arrays(set: &TrainingSet, stats: &NormStats) -> (Array2<f32>, Array2<f32>) {
    let n = set.len();
    let mut x = Array2::zeros((n, PARAM_COUNT));
    let mut y = Array2::zeros((n, 1));

    for (i, sample) in set.samples().iter().enumerate() {
        let z = stats.transform(&sample.inputs);
        for (j, &v) in z.iter().enumerate() {
            x[[i, j]] = v as f32;
        }
        y[[i, 0]] = stats.normalize_output(sample.output) as f32;
    }

    (x, y)
}

/// Assembles the configured architecture: ReLU hidden layers with the
/// configured penalties and dropout, then a single output unit.
fn build_network<R: Rng>(config: &TrainConfig, rng: &mut R) -> ml_core::Result<Sequential> {
    let mut layers = Vec::new();
    let mut in_dim = PARAM_COUNT;

    for (i, &width) in config.architecture.hidden_widths().iter().enumerate() {
        let l2 = if i < config.l2_hidden { config.l2 } else { 0.0 };
        layers.push(Layer::dense_l2((in_dim, width), Some(ActFn::Relu), l2));

        if let Some(&rate) = config.dropout.get(i) {
            layers.push(Layer::dropout(rate));
        }

        in_dim = width;
    }

    let out_act = config.sigmoid_output.then_some(ActFn::Sigmoid);
    layers.push(Layer::dense((in_dim, 1), out_act));

    Sequential::init(layers, rng)
}

/// Copies the picked rows of `src` into a reused buffer.
fn gather_rows(src: &Array2<f32>, picks: &[usize], buf: Array2<f32>) -> Array2<f32> {
    let mut out = if buf.dim() == (picks.len(), src.ncols()) {
        buf
    } else {
        Array2::zeros((picks.len(), src.ncols()))
    };

    for (bi, &si) in picks.iter().enumerate() {
        out.row_mut(bi).assign(&src.row(si));
    }

    out
}
