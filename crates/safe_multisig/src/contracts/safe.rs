use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface Safe {
        /// @notice Returns the version of the wallet contract
        function VERSION() external view returns (string memory);

        function getThreshold() external view returns (uint256);

        function getOwners() external view returns (address[] memory);

        function isOwner(address owner) external view returns (bool);

        function nonce() external view returns (uint256);

        /// @notice Nonzero when `owner` approved `hash` on-chain
        function approvedHashes(address owner, bytes32 hash) external view returns (uint256);

        function approveHash(bytes32 hashToApprove) external;

        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes memory signatures
        ) external payable returns (bool);

        /// @notice The wallet's own computation of the signing hash
        function getTransactionHash(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            uint256 _nonce
        ) external view returns (bytes32);

        event ExecutionSuccess(bytes32 txHash, uint256 payment);

        event ExecutionFailure(bytes32 txHash, uint256 payment);
    }
}
