use anyhow::{Result, ensure};
use candle_core::{DType, Tensor, D};

/// Mean of the unmasked token states followed by L2 normalisation.
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; returns `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, tokens, width) = match hidden.dims() {
        &[b, t, h] => (b, t, h),
        other => anyhow::bail!("hidden states must be [B,T,H], got {other:?}"),
    };
    ensure!(attention_mask.dims() == [batch, tokens], "mask shape {:?} does not match hidden {:?}", attention_mask.dims(), hidden.dims());

    let weights = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let summed = hidden.broadcast_mul(&weights.unsqueeze(D::Minus1)?)?.sum(1)?;
    let counts = weights.sum_keepdim(1)?;
    let mean = summed.broadcast_div(&counts)?;

    let floor = if hidden.dtype() == DType::F16 { 1e-6 } else { 1e-12 };
    let norms = mean.sqr()?.sum_keepdim(1)?.sqrt()?.affine(1.0, floor)?;
    let pooled = mean.broadcast_div(&norms)?;
    ensure!(pooled.dims() == [batch, width], "pooled shape mismatch: {:?}", pooled.dims());
    Ok(pooled)
}
